// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

mod reader;

pub use reader::{
    build_graph, elements_from_buffer, elements_from_file, elements_from_io,
    load_graph_from_buffer, load_graph_from_file, load_graph_from_io, Element, FileFormat,
    Options,
};
