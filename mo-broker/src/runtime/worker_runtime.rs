//! Runtime helper for spawning egress forwarding loops.

use crate::api::transport::MessageSender;
use crate::message::OutboundMessage;
use std::io;
use std::sync::Arc;
use std::thread;
use tokio::runtime::Builder;
use tokio::sync::broadcast::Receiver;

/// Runs `run_loop` on a dedicated thread driving its own current-thread runtime,
/// so slow senders never stall the caller's executor.
pub(crate) fn spawn_message_forwarding_loop<F, Fut>(
    thread_name: String,
    sender: Arc<dyn MessageSender>,
    message_receiver: Receiver<Arc<OutboundMessage>>,
    run_loop: F,
) -> io::Result<()>
where
    F: FnOnce(Arc<dyn MessageSender>, Receiver<Arc<OutboundMessage>>) -> Fut + Send + 'static,
    Fut: std::future::Future<Output = ()> + Send + 'static,
{
    let runtime = Builder::new_current_thread().enable_all().build()?;

    thread::Builder::new().name(thread_name).spawn(move || {
        runtime.block_on(run_loop(sender, message_receiver));
    })?;
    Ok(())
}
