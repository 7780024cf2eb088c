pub mod tree_sitter_python;

pub use tree_sitter_python::TreeSitterPythonParser;
