mod typst;

pub use typst::{compile, render};
