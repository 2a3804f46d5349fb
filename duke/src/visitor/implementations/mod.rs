mod infallible;
mod tree;
