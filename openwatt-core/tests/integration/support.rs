//! Test doubles shared by the integration tests

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use openwatt_core::{
    CommandResponse, CommandTransport, ConfigError, ConfigResult, Endpoint, EndpointRegistry,
    Scheme, TransportError, TransportResult,
};
use tokio::sync::Semaphore;
use uuid::Uuid;

/// One recorded `execute` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub endpoint_id: Uuid,
    pub command: String,
}

/// Transport that replays queued results, then repeats a fallback
///
/// A gated transport parks every `execute` until [`ScriptedTransport::release`]
/// is called, which lets tests observe a command while it is in flight.
pub struct ScriptedTransport {
    script: Mutex<VecDeque<TransportResult<CommandResponse>>>,
    fallback: TransportResult<CommandResponse>,
    probe: TransportResult<()>,
    calls: Mutex<Vec<Call>>,
    probed: Mutex<Vec<Endpoint>>,
    gate: Option<Semaphore>,
}

impl ScriptedTransport {
    pub fn new(fallback: TransportResult<CommandResponse>) -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            fallback,
            probe: Ok(()),
            calls: Mutex::new(Vec::new()),
            probed: Mutex::new(Vec::new()),
            gate: None,
        }
    }

    pub fn online(output: &str) -> Self {
        Self::new(ok(output))
    }

    pub fn offline() -> Self {
        Self::new(Err(network_error()))
    }

    pub fn then(self, result: TransportResult<CommandResponse>) -> Self {
        self.script.lock().unwrap().push_back(result);
        self
    }

    pub fn gated(mut self) -> Self {
        self.gate = Some(Semaphore::new(0));
        self
    }

    pub fn with_probe(mut self, probe: TransportResult<()>) -> Self {
        self.probe = probe;
        self
    }

    /// Lets one parked `execute` complete
    pub fn release(&self) {
        if let Some(gate) = &self.gate {
            gate.add_permits(1);
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Endpoints passed to `probe`, in order
    pub fn probed(&self) -> Vec<Endpoint> {
        self.probed.lock().unwrap().clone()
    }
}

#[async_trait]
impl CommandTransport for ScriptedTransport {
    async fn execute(
        &self,
        endpoint: &Endpoint,
        command: &str,
    ) -> TransportResult<CommandResponse> {
        self.calls.lock().unwrap().push(Call {
            endpoint_id: endpoint.id,
            command: command.to_string(),
        });

        if let Some(gate) = &self.gate {
            gate.acquire().await.expect("gate closed").forget();
        }

        let next = self.script.lock().unwrap().pop_front();
        next.unwrap_or_else(|| self.fallback.clone())
    }

    async fn probe(&self, endpoint: &Endpoint) -> TransportResult<()> {
        self.probed.lock().unwrap().push(endpoint.clone());
        self.probe.clone()
    }
}

/// Transport whose `execute` always panics
pub struct PanickingTransport;

#[async_trait]
impl CommandTransport for PanickingTransport {
    async fn execute(
        &self,
        _endpoint: &Endpoint,
        _command: &str,
    ) -> TransportResult<CommandResponse> {
        panic!("device driver exploded");
    }

    async fn probe(&self, _endpoint: &Endpoint) -> TransportResult<()> {
        Ok(())
    }
}

/// Registry that accepts any current marker, even one with no endpoint
///
/// Stands in for a registry edited behind the monitor's back.
pub struct UncheckedRegistry {
    endpoints: Vec<Endpoint>,
    current: Mutex<Option<Uuid>>,
}

impl UncheckedRegistry {
    pub fn new(endpoints: Vec<Endpoint>, current: Option<Uuid>) -> Self {
        Self {
            endpoints,
            current: Mutex::new(current),
        }
    }
}

impl EndpointRegistry for UncheckedRegistry {
    fn resolve(&self, id: Uuid) -> Option<Endpoint> {
        self.endpoints.iter().find(|e| e.id == id).cloned()
    }

    fn list_all(&self) -> Vec<Endpoint> {
        self.endpoints.clone()
    }

    fn current_id(&self) -> Option<Uuid> {
        *self.current.lock().unwrap()
    }

    fn set_current(&self, id: Uuid) -> ConfigResult<()> {
        if self.resolve(id).is_none() {
            return Err(ConfigError::NotFound(id.to_string()));
        }
        *self.current.lock().unwrap() = Some(id);
        Ok(())
    }

    fn clear_current(&self) -> ConfigResult<()> {
        *self.current.lock().unwrap() = None;
        Ok(())
    }
}

pub fn ok(output: &str) -> TransportResult<CommandResponse> {
    Ok(CommandResponse {
        output: output.to_string(),
        exit_code: 0,
        error: None,
    })
}

pub fn network_error() -> TransportError {
    TransportError::NetworkError("connection refused".to_string())
}

pub fn endpoint(name: &str) -> Endpoint {
    Endpoint::new(name, format!("{name}.local"), 80, Scheme::Http)
}
