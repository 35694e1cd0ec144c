//! Headless monitor: connects to a router and prints every event the
//! actor system emits. Useful for watching a wall of panels fight over
//! outputs, and as a wiring reference for hosting shells.
//!
//! Usage: videohub-monitor <host> [port]

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use futures::stream::StreamExt;

use hub_actors::{shared_hub, HubActor, ReconnectActor, RoutingApi, SocketActor};
use hub_protocol::SystemEvent;
use hub_runtime::{spawn_actor, ChannelManager};

#[tokio::main]
async fn main() {
    let mut args = std::env::args().skip(1);
    let host = match args.next() {
        Some(h) => h,
        None => {
            eprintln!("Usage: videohub-monitor <host> [port]");
            std::process::exit(2);
        }
    };
    let port = args
        .next()
        .and_then(|p| p.parse().ok())
        .unwrap_or(hub_actors::constants::socket::DEFAULT_PORT);

    let (mut manager, handles) = ChannelManager::new();
    let mut events = manager.take_event_receiver();

    let shared = shared_hub();
    let connected = Arc::new(AtomicBool::new(false));
    let api = RoutingApi::new(manager.socket_sender(), connected.clone());

    spawn_actor(
        HubActor::new(shared.clone(), api, handles.event_tx.clone()),
        handles.hub_rx,
        handles.event_tx.clone(),
    );
    spawn_actor(
        SocketActor::new(
            manager.hub_sender(),
            manager.reconnect_sender(),
            handles.event_tx.clone(),
            manager.socket_sender(),
            connected,
        ),
        handles.socket_rx,
        handles.event_tx.clone(),
    );
    spawn_actor(
        ReconnectActor::new(manager.socket_sender(), handles.event_tx.clone()),
        handles.reconnect_rx,
        handles.event_tx,
    );

    if let Err(e) = manager.connect(&host, port) {
        eprintln!("{}", e);
        std::process::exit(1);
    }
    println!("Connecting to {}:{}...", host, port);

    while let Some(event) = events.next().await {
        match event {
            SystemEvent::Connected => println!("connected"),
            SystemEvent::Disconnected => println!("disconnected"),
            SystemEvent::DeviceChanged { info } => {
                println!(
                    "device: {} ({} in / {} out / {} monitor / {} serial)",
                    info.model_name,
                    info.counts.inputs,
                    info.counts.outputs,
                    info.counts.monitors,
                    info.counts.serials
                );
            }
            SystemEvent::RoutingChanged { output, source } => {
                println!("route: output {} <- input {}", output, source);
            }
            SystemEvent::SerialRoutingChanged { serial, source } => {
                println!("serial route: port {} <- port {}", serial, source);
            }
            SystemEvent::LabelsChanged => println!("labels changed"),
            SystemEvent::LocksChanged => {
                let shared = shared
                    .lock()
                    .unwrap_or_else(std::sync::PoisonError::into_inner);
                let owned: Vec<usize> = shared
                    .state
                    .outputs()
                    .filter(|o| o.lock == hub_protocol::LockState::Owned)
                    .map(|o| o.id)
                    .collect();
                println!("locks changed, owned outputs: {:?}", owned);
            }
            SystemEvent::StatusChanged => println!("port status changed"),
            SystemEvent::SelectionChanged { output } => {
                println!("selection: {:?}", output);
            }
            SystemEvent::QueueChanged { staged } => {
                println!("staged: {:?}", staged);
            }
            SystemEvent::StatusUpdate { message } => println!("{}", message),
            SystemEvent::Error { message } => eprintln!("error: {}", message),
        }
    }
}
