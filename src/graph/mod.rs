mod graph;
mod route;

pub use graph::NetworkGraph;
