use crate::key_map::{is_ctrl_c, map_key_event};
use core_events::{Event, InputEvent};
use crossterm::event::{Event as CEvent, EventStream, KeyEvent as CKeyEvent};
use std::io;
use std::sync::Arc;
use tokio::sync::{Notify, mpsc::Sender};
use tokio::task;
use tokio_stream::StreamExt;
use tracing::{info, trace, warn};

#[derive(Clone, Debug)]
pub struct AsyncInputShutdown {
    notify: Arc<Notify>,
}

impl AsyncInputShutdown {
    pub fn signal(&self) {
        self.notify.notify_one();
    }
}

#[derive(Clone, Debug)]
struct ShutdownListener {
    notify: Arc<Notify>,
}

impl ShutdownListener {
    fn new_pair() -> (AsyncInputShutdown, Self) {
        let notify = Arc::new(Notify::new());
        (
            AsyncInputShutdown {
                notify: notify.clone(),
            },
            ShutdownListener { notify },
        )
    }

    async fn wait(&self) {
        self.notify.notified().await;
    }
}

/// Spawn a Tokio task forwarding terminal events from `EventStream`.
pub(crate) fn spawn_async_event_task(
    sender: Sender<Event>,
) -> (task::JoinHandle<()>, AsyncInputShutdown) {
    let (shutdown, listener) = ShutdownListener::new_pair();
    let handle = task::spawn(async move {
        let span = tracing::debug_span!(target: "input.thread", "input_async_task");
        let _enter = span.enter();
        AsyncEventStreamTask::new(sender, EventStream::new(), listener)
            .run()
            .await;
    });
    (handle, shutdown)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ExitReason {
    ShutdownSignal,
    ChannelClosed,
    StreamEnded,
    StreamError,
}

impl ExitReason {
    fn as_str(&self) -> &'static str {
        match self {
            ExitReason::ShutdownSignal => "shutdown_signal",
            ExitReason::ChannelClosed => "channel_closed",
            ExitReason::StreamEnded => "stream_ended",
            ExitReason::StreamError => "stream_error",
        }
    }
}

struct AsyncEventStreamTask<S>
where
    S: tokio_stream::Stream<Item = io::Result<CEvent>> + Send + Unpin + 'static,
{
    sender: Sender<Event>,
    stream: S,
    shutdown: ShutdownListener,
}

impl<S> AsyncEventStreamTask<S>
where
    S: tokio_stream::Stream<Item = io::Result<CEvent>> + Send + Unpin + 'static,
{
    fn new(sender: Sender<Event>, stream: S, shutdown: ShutdownListener) -> Self {
        Self {
            sender,
            stream,
            shutdown,
        }
    }

    async fn run(mut self) {
        info!(target: "input.thread", "async_input_task_started");
        let reason = loop {
            let maybe_result = tokio::select! {
                biased;
                _ = self.shutdown.wait() => break ExitReason::ShutdownSignal,
                result = self.stream.next() => result,
            };

            let Some(result) = maybe_result else {
                break ExitReason::StreamEnded;
            };

            let forwarded = match result {
                Ok(CEvent::Key(key)) => self.handle_key_event(key).await,
                Ok(CEvent::Resize(w, h)) => {
                    trace!(target: "input.event", w, h, "resize");
                    self.send_event(Event::Input(InputEvent::Resize(w, h))).await
                }
                Ok(_) => true,
                Err(err) => {
                    warn!(target: "input.thread", error_kind = ?err.kind(), "async_input_task_stream_error");
                    break ExitReason::StreamError;
                }
            };
            if !forwarded {
                break ExitReason::ChannelClosed;
            }
        };

        info!(target: "input.thread", reason = reason.as_str(), "async_input_task_stopped");
    }

    /// Returns false once the receiver is gone.
    async fn handle_key_event(&mut self, key: CKeyEvent) -> bool {
        if is_ctrl_c(&key) {
            return self.send_event(Event::Input(InputEvent::CtrlC)).await;
        }
        match map_key_event(&key) {
            Some(mapped) => {
                trace!(target: "input.event", key = %mapped, "keypress");
                self.send_event(Event::Input(InputEvent::Key(mapped))).await
            }
            None => true,
        }
    }

    async fn send_event(&mut self, event: Event) -> bool {
        self.sender.send(event).await.is_ok()
    }
}
