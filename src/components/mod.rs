pub mod network_graph;
pub mod settings_panel;
