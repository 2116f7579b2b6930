#![allow(dead_code)]

use async_trait::async_trait;
use denon_avr_control::{
    AppCommand, AvrError, AvrReceiver, HttpTransport, ReceiverConfig, Result, TelnetTransport,
};
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

/// HTTP transport that records every call
pub struct MockHttp {
    pub get_calls: AtomicU32,
    pub post_calls: AtomicU32,
    pub commands: Mutex<Vec<String>>,
    pub appcommands: Mutex<Vec<AppCommand>>,
    pub appcommand_response: Mutex<String>,
    pub fail: AtomicBool,
}

impl MockHttp {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            get_calls: AtomicU32::new(0),
            post_calls: AtomicU32::new(0),
            commands: Mutex::new(Vec::new()),
            appcommands: Mutex::new(Vec::new()),
            appcommand_response: Mutex::new("<rx><cmd>OK</cmd></rx>".to_string()),
            fail: AtomicBool::new(false),
        })
    }

    pub fn calls(&self) -> u32 {
        self.get_calls.load(Ordering::SeqCst) + self.post_calls.load(Ordering::SeqCst)
    }

    pub fn last_command(&self) -> Option<String> {
        self.commands.lock().unwrap().last().cloned()
    }

    pub fn last_appcommand(&self) -> Option<AppCommand> {
        self.appcommands.lock().unwrap().last().cloned()
    }

    pub fn respond_with(&self, body: &str) {
        *self.appcommand_response.lock().unwrap() = body.to_string();
    }
}

#[async_trait]
impl HttpTransport for MockHttp {
    async fn get_command(&self, command: &str) -> Result<String> {
        self.get_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            return Err(AvrError::Timeout);
        }
        self.commands.lock().unwrap().push(command.to_string());
        Ok(String::new())
    }

    async fn post_appcommand(&self, commands: &[AppCommand]) -> Result<String> {
        self.post_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            return Err(AvrError::Timeout);
        }
        self.appcommands
            .lock()
            .unwrap()
            .extend(commands.iter().cloned());
        Ok(self.appcommand_response.lock().unwrap().clone())
    }
}

/// Telnet transport that records every batch
pub struct MockTelnet {
    pub calls: AtomicU32,
    pub commands: Mutex<Vec<String>>,
    pub connected: AtomicBool,
    pub healthy: AtomicBool,
    pub fail: AtomicBool,
}

impl MockTelnet {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicU32::new(0),
            commands: Mutex::new(Vec::new()),
            connected: AtomicBool::new(true),
            healthy: AtomicBool::new(true),
            fail: AtomicBool::new(false),
        })
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_command(&self) -> Option<String> {
        self.commands.lock().unwrap().last().cloned()
    }

    pub fn set_healthy(&self, healthy: bool) {
        self.healthy.store(healthy, Ordering::SeqCst);
    }

    pub fn set_connected(&self, connected: bool) {
        self.connected.store(connected, Ordering::SeqCst);
    }
}

#[async_trait]
impl TelnetTransport for MockTelnet {
    fn connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    fn healthy(&self) -> bool {
        self.healthy.load(Ordering::SeqCst)
    }

    async fn send_commands(&self, commands: &[String]) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            return Err(AvrError::ConnectionClosed);
        }
        self.commands.lock().unwrap().extend(commands.iter().cloned());
        Ok(())
    }
}

pub struct Harness {
    pub receiver: AvrReceiver,
    pub http: Arc<MockHttp>,
    pub telnet: Arc<MockTelnet>,
}

impl Harness {
    /// Total transport calls across all channels
    pub fn calls(&self) -> u32 {
        self.http.calls() + self.telnet.calls()
    }
}

pub fn harness() -> Harness {
    harness_with(ReceiverConfig::default())
}

pub fn harness_with(config: ReceiverConfig) -> Harness {
    init_tracing();
    let http = MockHttp::new();
    let telnet = MockTelnet::new();
    let receiver = AvrReceiver::with_transports(
        "192.168.1.50",
        http.clone(),
        Some(telnet.clone() as Arc<dyn TelnetTransport>),
        config,
    );
    Harness {
        receiver,
        http,
        telnet,
    }
}

pub fn http_only() -> (AvrReceiver, Arc<MockHttp>) {
    init_tracing();
    let http = MockHttp::new();
    let receiver = AvrReceiver::with_transports(
        "192.168.1.50",
        http.clone(),
        None,
        ReceiverConfig::default(),
    );
    (receiver, http)
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}
