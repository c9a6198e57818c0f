pub mod matrix;
pub mod resolver;

pub use matrix::{category_matrices, pool_matrix, MatrixCell, MatrixRow, PoolMatrix};
pub use resolver::{head_to_head, HeadToHead};
