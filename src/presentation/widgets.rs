pub mod input_line;
pub mod post_card;
