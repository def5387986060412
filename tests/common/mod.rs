//! Shared utilities for integration tests.

use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use streaming_http_adapter::config::AdapterConfig;
use streaming_http_adapter::http::HttpServer;
use streaming_http_adapter::lifecycle::{Shutdown, ShutdownReason};
use streaming_http_adapter::rpc::{InputSignal, OutputFrame, OutputSignal};
use streaming_http_adapter::{InvocationStream, Invoker};
use tokio::net::TcpListener;
use tonic::Status;

/// How a scripted invocation answers.
#[derive(Clone, Default)]
pub enum Reply {
    /// Output frames followed by a clean end of stream.
    #[default]
    Empty,
    Output(Vec<OutputFrame>),
    /// Fail the data frame send.
    RejectData(Status),
    /// Hold the stream open without answering.
    Hang,
}

/// Invoker double that records the signals it receives.
#[derive(Clone, Default)]
pub struct ScriptedInvoker {
    pub reply: Reply,
    pub invocations: Arc<Mutex<Vec<Vec<InputSignal>>>>,
    released: Arc<AtomicUsize>,
}

impl ScriptedInvoker {
    pub fn new(reply: Reply) -> Self {
        Self {
            reply,
            ..Default::default()
        }
    }

    pub fn invocation_count(&self) -> usize {
        self.invocations.lock().unwrap().len()
    }

    pub fn sent(&self, invocation: usize) -> Vec<InputSignal> {
        self.invocations.lock().unwrap()[invocation].clone()
    }

    /// Number of invocation streams dropped so far.
    pub fn released_count(&self) -> usize {
        self.released.load(Ordering::SeqCst)
    }

    /// Wait until every opened invocation stream has been dropped.
    pub async fn wait_released(&self) -> bool {
        for _ in 0..100 {
            if self.released_count() == self.invocation_count() {
                return true;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        false
    }
}

struct ScriptedStream {
    index: usize,
    reply: Reply,
    invocations: Arc<Mutex<Vec<Vec<InputSignal>>>>,
    outputs: VecDeque<OutputFrame>,
    released: Arc<AtomicUsize>,
}

impl Drop for ScriptedStream {
    fn drop(&mut self) {
        self.released.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl Invoker for ScriptedInvoker {
    async fn invoke(&self) -> Result<Box<dyn InvocationStream>, Status> {
        let mut invocations = self.invocations.lock().unwrap();
        invocations.push(Vec::new());
        let outputs = match &self.reply {
            Reply::Output(frames) => frames.iter().cloned().collect(),
            _ => VecDeque::new(),
        };
        Ok(Box::new(ScriptedStream {
            index: invocations.len() - 1,
            reply: self.reply.clone(),
            invocations: self.invocations.clone(),
            outputs,
            released: self.released.clone(),
        }))
    }
}

#[async_trait]
impl InvocationStream for ScriptedStream {
    async fn send(&mut self, signal: InputSignal) -> Result<(), Status> {
        let is_data = signal.as_data().is_some();
        self.invocations.lock().unwrap()[self.index].push(signal);
        match &self.reply {
            Reply::RejectData(status) if is_data => Err(status.clone()),
            _ => Ok(()),
        }
    }

    async fn close_send(&mut self) -> Result<(), Status> {
        Ok(())
    }

    async fn recv(&mut self) -> Result<Option<OutputSignal>, Status> {
        if let Reply::Hang = self.reply {
            std::future::pending::<()>().await;
        }
        Ok(self.outputs.pop_front().map(OutputSignal::data))
    }
}

/// Output frame with the given payload and content type.
pub fn output(payload: &str, content_type: &str) -> OutputFrame {
    OutputFrame {
        payload: payload.as_bytes().to_vec(),
        content_type: content_type.to_string(),
        ..Default::default()
    }
}

/// A running adapter on an ephemeral port.
pub struct TestAdapter {
    pub addr: SocketAddr,
    shutdown: Shutdown,
}

impl TestAdapter {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for TestAdapter {
    fn drop(&mut self) {
        self.shutdown.trigger(ShutdownReason::Signal);
    }
}

/// Start the real HTTP server in front of `invoker`.
pub async fn start_adapter(config: AdapterConfig, invoker: ScriptedInvoker) -> TestAdapter {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config, Arc::new(invoker));
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    // Give the accept loop a moment to start.
    tokio::time::sleep(Duration::from_millis(50)).await;
    TestAdapter { addr, shutdown }
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
