pub mod assistant;
pub mod detail;
pub mod feed;
pub mod search;
pub mod status_bar;
pub mod title_bar;
