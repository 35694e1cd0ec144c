use std::sync::{Arc, Mutex, PoisonError};

use futures_channel::mpsc;

use hub_protocol::{HubCommand, HubError, SystemEvent};
use hub_runtime::{hub_debug, hub_info, hub_warn, Actor, HubMessage};
use hub_state::{interpret, HubState, Outcome};

use crate::api::RoutingApi;
use crate::queue::QueueTake;

/// Everything behind the single coarse mutex: the device model plus the
/// staged take operation. Operations are O(ports) at worst, so one lock
/// is cheap and removes any question of ordering between the read path
/// and concurrent callers.
#[derive(Debug, Default)]
pub struct SharedHub {
    pub state: HubState,
    pub queue: QueueTake,
}

pub type SharedHandle = Arc<Mutex<SharedHub>>;

pub fn shared_hub() -> SharedHandle {
    Arc::new(Mutex::new(SharedHub::default()))
}

/// Owns the device model. Inbound blocks mutate state through the
/// interpreters; caller commands go out through the Routing API, which
/// never mutates - state changes only when the device confirms.
pub struct HubActor {
    shared: SharedHandle,
    api: RoutingApi,
    event_tx: mpsc::Sender<SystemEvent>,
}

impl HubActor {
    pub fn new(shared: SharedHandle, api: RoutingApi, event_tx: mpsc::Sender<SystemEvent>) -> Self {
        Self {
            shared,
            api,
            event_tx,
        }
    }

    fn shared(&self) -> std::sync::MutexGuard<'_, SharedHub> {
        // A poisoned mutex means another holder panicked; the data is
        // still the best model we have, so keep serving it.
        self.shared.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn emit(&self, event: SystemEvent) {
        if self.event_tx.clone().try_send(event).is_err() {
            hub_warn!("HubActor: event channel full or closed, event dropped");
        }
    }

    fn handle_block(&mut self, block: framing::Block) -> Result<(), HubError> {
        let applied = {
            let mut shared = self.shared();
            interpret::apply(&mut shared.state, &block)
        };

        for warning in &applied.warnings {
            hub_warn!("HubActor: {} block: {}", block.name, warning);
        }

        match applied.outcome {
            Outcome::Device(info) => {
                hub_info!(
                    "HubActor: connected to a {} ({} in, {} out, {} monitor, {} serial)",
                    info.model_name,
                    info.counts.inputs,
                    info.counts.outputs,
                    info.counts.monitors,
                    info.counts.serials
                );
                self.emit(SystemEvent::DeviceChanged { info });
            }
            Outcome::Labels { changed } => {
                if changed > 0 {
                    self.emit(SystemEvent::LabelsChanged);
                }
            }
            Outcome::Routing(routes) => {
                for route in routes {
                    self.emit(SystemEvent::RoutingChanged {
                        output: route.output,
                        source: route.source,
                    });
                }
            }
            Outcome::SerialRouting(routes) => {
                for route in routes {
                    self.emit(SystemEvent::SerialRoutingChanged {
                        serial: route.output,
                        source: route.source,
                    });
                }
            }
            Outcome::Locks { changed } => {
                if changed > 0 {
                    self.emit(SystemEvent::LocksChanged);
                }
            }
            Outcome::Status { changed } => {
                if changed > 0 {
                    self.emit(SystemEvent::StatusChanged);
                }
            }
            Outcome::Ignored => {
                hub_debug!("HubActor: ignoring unknown block '{}'", block.name);
            }
        }

        Ok(())
    }

    fn handle_command(&mut self, cmd: HubCommand) -> Result<(), HubError> {
        match cmd {
            HubCommand::Route {
                output,
                source,
                force,
            } => {
                let shared = self.shared();
                if !self.api.set_output_route(&shared.state, output, source, force)? {
                    hub_debug!("HubActor: route {} → {} denied by lock", source, output);
                }
            }

            HubCommand::RouteSerial {
                serial,
                source,
                force,
            } => {
                let shared = self.shared();
                if !self.api.set_serial_route(&shared.state, serial, source, force)? {
                    hub_debug!(
                        "HubActor: serial route {} → {} denied by lock",
                        source,
                        serial
                    );
                }
            }

            HubCommand::ReturnToPrevious { output, force } => {
                self.return_to_previous(output, force)?;
            }

            HubCommand::RouteMany { routes } => {
                let shared = self.shared();
                let applied = self.api.set_multiple_output_routes(&shared.state, &routes)?;
                hub_info!("HubActor: bulk routed {} outputs", applied);
            }

            HubCommand::RenameInput { input, name } => {
                let shared = self.shared();
                self.api.set_input_label(&shared.state, input, &name)?;
            }

            HubCommand::RenameOutput { output, name } => {
                let shared = self.shared();
                self.api.set_output_label(&shared.state, output, &name)?;
            }

            HubCommand::RenameSerial { serial, name } => {
                let shared = self.shared();
                self.api.set_serial_label(&shared.state, serial, &name)?;
            }

            HubCommand::SetOutputLock { output, lock } => {
                let shared = self.shared();
                self.api.set_output_locked(&shared.state, output, lock)?;
            }

            HubCommand::SetSerialLock { serial, lock } => {
                let shared = self.shared();
                self.api.set_serial_locked(&shared.state, serial, lock)?;
            }

            HubCommand::ToggleOutputLock { output } => {
                let shared = self.shared();
                let current = shared
                    .state
                    .output(output)
                    .ok_or_else(|| HubError::OutOfRangeIndex {
                        space: "video outputs".into(),
                        index: output,
                        count: shared.state.counts().total_outputs(),
                    })?
                    .lock;
                self.api
                    .set_output_locked(&shared.state, output, current.toggled())?;
            }

            HubCommand::ToggleSerialLock { serial } => {
                let shared = self.shared();
                let current = shared
                    .state
                    .serial(serial)
                    .ok_or_else(|| HubError::OutOfRangeIndex {
                        space: "serial ports".into(),
                        index: serial,
                        count: shared.state.counts().serials,
                    })?
                    .lock;
                self.api
                    .set_serial_locked(&shared.state, serial, current.toggled())?;
            }

            HubCommand::SelectDestination { output } => {
                let staged = {
                    let mut shared = self.shared();
                    if shared.state.output(output).is_none() {
                        return Err(HubError::OutOfRangeIndex {
                            space: "video outputs".into(),
                            index: output,
                            count: shared.state.counts().total_outputs(),
                        });
                    }
                    shared.state.selected_destination = Some(output);
                    // A staged operation follows the selection.
                    shared.queue.retarget(output);
                    shared.queue.staged()
                };
                self.emit(SystemEvent::SelectionChanged {
                    output: Some(output),
                });
                if staged.is_some() {
                    self.emit(SystemEvent::QueueChanged { staged });
                }
            }

            HubCommand::StageRoute { source } => {
                let staged = {
                    let mut shared = self.shared();
                    match shared.state.selected_destination {
                        Some(dest) => {
                            shared.queue.stage(dest, source);
                            shared.queue.staged()
                        }
                        None => {
                            hub_warn!("HubActor: stage requested with no destination selected");
                            return Ok(());
                        }
                    }
                };
                self.emit(SystemEvent::QueueChanged { staged });
            }

            HubCommand::Take { force } => {
                let op = {
                    let mut shared = self.shared();
                    shared.queue.take()
                };
                self.emit(SystemEvent::QueueChanged { staged: None });
                if let Some(op) = op {
                    let shared = self.shared();
                    if !self
                        .api
                        .set_output_route(&shared.state, op.output, op.source, force)?
                    {
                        hub_debug!(
                            "HubActor: take {} → {} denied by lock",
                            op.source,
                            op.output
                        );
                    }
                }
            }

            HubCommand::ClearStaged => {
                let cleared = {
                    let mut shared = self.shared();
                    shared.queue.clear()
                };
                if cleared {
                    self.emit(SystemEvent::QueueChanged { staged: None });
                }
            }
        }

        Ok(())
    }

    fn return_to_previous(&mut self, output: usize, force: bool) -> Result<(), HubError> {
        let previous = {
            let mut shared = self.shared();
            let port = shared
                .state
                .output(output)
                .ok_or_else(|| HubError::OutOfRangeIndex {
                    space: "video outputs".into(),
                    index: output,
                    count: shared.state.counts().total_outputs(),
                })?;

            // Check the gate before consuming history; a denied return
            // should leave the stack intact.
            if port.lock == hub_protocol::LockState::Owned && !force {
                hub_debug!("HubActor: return-to-previous on {} denied by lock", output);
                return Ok(());
            }

            match shared.state.output_mut(output) {
                Some(port) => port.fallback.pop_previous(),
                None => None,
            }
        };

        if let Some(source) = previous {
            let shared = self.shared();
            self.api.set_output_route(&shared.state, output, source, force)?;
        } else {
            hub_debug!("HubActor: output {} has no previous route", output);
        }

        Ok(())
    }
}

impl Actor for HubActor {
    type Message = HubMessage;

    fn name(&self) -> &'static str {
        "HubActor"
    }

    async fn handle(&mut self, msg: HubMessage) -> Result<(), HubError> {
        match msg {
            HubMessage::Command(cmd) => self.handle_command(cmd),
            HubMessage::Block(block) => self.handle_block(block),
            HubMessage::SocketConnected => {
                hub_info!("HubActor: transport connected");
                // Staged take operations survive the reconnect; the
                // operator's intent did not change because the link blinked.
                self.emit(SystemEvent::Connected);
                Ok(())
            }
            HubMessage::SocketClosed { reason } => {
                hub_info!("HubActor: transport closed: {}", reason);
                self.emit(SystemEvent::Disconnected);
                Ok(())
            }
        }
    }
}
