//! Thread-safe parser pool for tree-sitter parsers.
//!
//! Tree-sitter's `Parser` is not `Send + Sync`, so a fixed set of worker
//! threads each own their own `Parser` and take requests over a channel;
//! `parse` bridges that into async via `spawn_blocking`.

use std::path::PathBuf;

use anyhow::Result;
use tree_sitter::{Language, Parser};

/// Languages with a tree-sitter grammar wired up. Anything else falls
/// back to [`crate::heuristic`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    Rust,
    TypeScript,
    JavaScript,
    Python,
    Go,
    Java,
    C,
    Cpp,
}

impl FileType {
    pub fn from_path(path: &std::path::Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        match ext {
            "rs" => Some(FileType::Rust),
            "ts" | "tsx" => Some(FileType::TypeScript),
            "js" | "jsx" | "mjs" | "cjs" => Some(FileType::JavaScript),
            "py" => Some(FileType::Python),
            "go" => Some(FileType::Go),
            "java" => Some(FileType::Java),
            "c" | "h" => Some(FileType::C),
            "cpp" | "cc" | "cxx" | "hpp" => Some(FileType::Cpp),
            _ => None,
        }
    }

    pub fn get_language(&self) -> Language {
        match self {
            FileType::Rust => tree_sitter_rust::LANGUAGE.into(),
            FileType::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            FileType::JavaScript => tree_sitter_javascript::LANGUAGE.into(),
            FileType::Python => tree_sitter_python::LANGUAGE.into(),
            FileType::Go => tree_sitter_go::LANGUAGE.into(),
            FileType::Java => tree_sitter_java::LANGUAGE.into(),
            FileType::C => tree_sitter_c::LANGUAGE.into(),
            FileType::Cpp => tree_sitter_cpp::LANGUAGE.into(),
        }
    }
}

#[derive(Debug)]
pub struct ParseRequest {
    pub file_type: FileType,
    pub content: String,
    pub path: PathBuf,
}

#[derive(Debug)]
pub struct ParseResult {
    pub tree: tree_sitter::Tree,
    pub path: PathBuf,
    pub content: String,
}

#[derive(Debug)]
struct WorkerRequest {
    request: ParseRequest,
    response_sender: std::sync::mpsc::Sender<Result<ParseResult>>,
}

pub struct ParserPool {
    sender: std::sync::mpsc::Sender<WorkerRequest>,
}

impl ParserPool {
    pub fn new(num_workers: usize) -> Self {
        let (sender, receiver) = std::sync::mpsc::channel::<WorkerRequest>();
        let receiver = std::sync::Arc::new(std::sync::Mutex::new(receiver));

        for i in 0..num_workers {
            let receiver = receiver.clone();
            std::thread::spawn(move || {
                Self::worker_thread(i, receiver);
            });
        }

        Self { sender }
    }

    fn worker_thread(
        worker_id: usize,
        receiver: std::sync::Arc<std::sync::Mutex<std::sync::mpsc::Receiver<WorkerRequest>>>,
    ) {
        tracing::debug!("parser worker {worker_id} started");
        let mut parser = Parser::new();

        loop {
            let request = match receiver.lock().unwrap().recv() {
                Ok(req) => req,
                Err(_) => {
                    tracing::debug!("parser worker {worker_id} shutting down");
                    break;
                }
            };

            let WorkerRequest { request, response_sender } = request;

            let language = request.file_type.get_language();
            if let Err(e) = parser.set_language(&language) {
                let _ = response_sender.send(Err(anyhow::anyhow!("failed to set language: {e}")));
                continue;
            }

            let result = match parser.parse(&request.content, None) {
                Some(tree) => Ok(ParseResult {
                    tree,
                    path: request.path,
                    content: request.content,
                }),
                None => Err(anyhow::anyhow!("failed to parse content")),
            };

            if response_sender.send(result).is_err() {
                tracing::warn!("parse caller dropped before result was sent");
            }
        }
    }

    pub async fn parse(&self, request: ParseRequest) -> Result<ParseResult> {
        let sender = self.sender.clone();
        tokio::task::spawn_blocking(move || {
            let (response_sender, response_receiver) = std::sync::mpsc::channel();
            let worker_request = WorkerRequest { request, response_sender };

            sender
                .send(worker_request)
                .map_err(|_| anyhow::anyhow!("parser pool is shut down"))?;

            response_receiver
                .recv()
                .map_err(|_| anyhow::anyhow!("parser worker died"))?
        })
        .await
        .map_err(|e| anyhow::anyhow!("task join error: {e}"))?
    }
}

impl Clone for ParserPool {
    fn clone(&self) -> Self {
        Self { sender: self.sender.clone() }
    }
}

pub fn create_parser_pool() -> ParserPool {
    let num_workers = std::thread::available_parallelism()
        .map(|n| n.get().max(2))
        .unwrap_or(2);
    ParserPool::new(num_workers)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn parses_rust_source() {
        let pool = create_parser_pool();
        let request = ParseRequest {
            file_type: FileType::Rust,
            content: "fn main() {}".to_string(),
            path: PathBuf::from("test.rs"),
        };
        let result = pool.parse(request).await.unwrap();
        assert_eq!(result.tree.root_node().kind(), "source_file");
    }

    #[tokio::test]
    async fn parses_python_source() {
        let pool = create_parser_pool();
        let request = ParseRequest {
            file_type: FileType::Python,
            content: "def foo():\n    pass\n".to_string(),
            path: PathBuf::from("test.py"),
        };
        let result = pool.parse(request).await.unwrap();
        assert_eq!(result.tree.root_node().kind(), "module");
    }
}
