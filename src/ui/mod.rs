pub mod app_shell;
mod detail_panel;
mod filter_panel;
mod info_panel;
mod point_cloud_viewer;
mod textures;
