pub mod a_star;
pub mod frontier;
pub mod node;
