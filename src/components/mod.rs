pub mod thought_graph;
