use std::future::Future;

use futures::stream::StreamExt;
use futures_channel::mpsc;
use hub_protocol::{HubError, SystemEvent};

/// Actor trait for implementing message-driven components
///
/// Actors are independent, stateful components that communicate through
/// message passing. Each actor has its own message queue and processes
/// messages sequentially.
///
/// # Lifecycle
///
/// 1. **init()** - Called once before message processing starts
/// 2. **handle()** - Called for each received message
/// 3. **shutdown()** - Called when the actor is stopping
///
/// # Example
///
/// ```ignore
/// struct MyActor {
///     state: u32,
///     event_tx: mpsc::Sender<SystemEvent>,
/// }
///
/// impl Actor for MyActor {
///     type Message = MyMessage;
///
///     fn name(&self) -> &'static str {
///         "MyActor"
///     }
///
///     async fn handle(&mut self, msg: Self::Message) -> Result<(), HubError> {
///         // Process message
///         Ok(())
///     }
/// }
/// ```
/// The async methods are written as `impl Future + Send` rather than
/// `async fn` so the run-loop future of a generic `A: Actor` satisfies
/// `tokio::spawn`'s `Send` bound. Implementations can still use plain
/// `async fn`.
pub trait Actor: Send + 'static {
    /// Message type this actor processes
    type Message: Send + 'static;

    /// Actor name (used for logging and debugging)
    fn name(&self) -> &'static str;

    /// Initialize the actor before processing messages
    ///
    /// Called once when the actor starts. Use this to set up resources,
    /// restore state, or perform initial configuration.
    fn init(&mut self) -> impl Future<Output = Result<(), HubError>> + Send {
        async { Ok(()) }
    }

    /// Handle a single message
    ///
    /// This is called for each message received by the actor.
    fn handle(&mut self, msg: Self::Message)
        -> impl Future<Output = Result<(), HubError>> + Send;

    /// Clean up before shutdown
    ///
    /// Called when the actor is stopping. Use this to close connections,
    /// save state, or release resources.
    fn shutdown(&mut self) -> impl Future<Output = ()> + Send {
        async {}
    }

    /// Main actor run loop (provided by runtime)
    ///
    /// This method consumes the actor and runs it to completion.
    /// It handles initialization, message processing, and shutdown.
    ///
    /// # Arguments
    ///
    /// * `rx` - Channel to receive messages from
    /// * `event_tx` - Channel to send events to the hosting shell
    fn run(
        mut self,
        mut rx: mpsc::Receiver<Self::Message>,
        event_tx: mpsc::Sender<SystemEvent>,
    ) -> impl Future<Output = ()> + Send
    where
        Self: Sized,
    {
        async move {
            // Initialize
            if let Err(e) = self.init().await {
                let _ = event_tx.clone().try_send(SystemEvent::Error {
                    message: format!("{} init failed: {}", self.name(), e),
                });
                return;
            }

            #[cfg(debug_assertions)]
            eprintln!("{} started", self.name());

            // Process messages
            while let Some(msg) = rx.next().await {
                if let Err(e) = self.handle(msg).await {
                    let _ = event_tx.clone().try_send(SystemEvent::Error {
                        message: format!("{} error: {}", self.name(), e),
                    });
                }
            }

            // Shutdown
            self.shutdown().await;

            #[cfg(debug_assertions)]
            eprintln!("{} stopped", self.name());
        }
    }
}

/// Spawn an actor onto the tokio runtime
pub fn spawn_actor<A>(
    actor: A,
    rx: mpsc::Receiver<A::Message>,
    event_tx: mpsc::Sender<SystemEvent>,
) -> tokio::task::JoinHandle<()>
where
    A: Actor,
{
    tokio::spawn(actor.run(rx, event_tx))
}
