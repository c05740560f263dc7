use crossterm::event::{self, KeyEvent};
use std::io;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::warn;

#[derive(Debug)]
pub enum Event {
    Key(KeyEvent),
    Resize(u16, u16),
    Tick,
}

/// Pumps terminal events from a dedicated thread so the async loop never
/// blocks on input.
///
/// The channel closes when the terminal stops answering polls, so
/// [`EventHandler::next`] returns `None` instead of spinning on ticks.
pub struct EventHandler {
    rx: mpsc::UnboundedReceiver<Event>,
}

impl EventHandler {
    pub fn new(tick_rate: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();

        std::thread::spawn(move || pump(tick_rate, event::poll, event::read, &tx));

        Self { rx }
    }

    pub async fn next(&mut self) -> Option<Event> {
        self.rx.recv().await
    }
}

fn pump<P, R>(tick_rate: Duration, mut poll: P, mut read: R, tx: &mpsc::UnboundedSender<Event>)
where
    P: FnMut(Duration) -> io::Result<bool>,
    R: FnMut() -> io::Result<event::Event>,
{
    loop {
        let ready = match poll(tick_rate) {
            Ok(ready) => ready,
            Err(e) => {
                warn!("Terminal event poll failed: {}", e);
                break;
            }
        };

        let sent = if ready {
            match read() {
                Ok(event::Event::Key(key)) => tx.send(Event::Key(key)),
                Ok(event::Event::Resize(width, height)) => tx.send(Event::Resize(width, height)),
                Ok(_) => Ok(()),
                Err(e) => {
                    warn!("Terminal event read failed: {}", e);
                    break;
                }
            }
        } else {
            tx.send(Event::Tick)
        };

        if sent.is_err() {
            break;
        }
    }
}
