pub mod capital;
