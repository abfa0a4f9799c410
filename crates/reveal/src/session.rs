//! The reveal scheduler: a timer-driven state machine that appends
//! one token per tick.

use inkflow_model::MessageId;
use tokio::select;
use tokio::sync::{mpsc, watch};
use tokio::time::sleep;

use crate::delay::reveal_delay;
use crate::tokenizer::{RevealToken, tokenize};

/// Glyph appended after the revealed prefix while a session is live.
pub const CURSOR_GLYPH: char = '▍';

/// Status of a reveal session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SessionStatus {
    /// Created but not yet revealing.
    Idle,
    /// Actively revealing tokens.
    Running,
    /// Suspended; the cursor is retained for resume.
    Paused,
    /// All tokens revealed.
    Completed,
    /// Stopped before completion; the partial prefix stands.
    Canceled,
}

impl SessionStatus {
    /// Returns `true` once the session can make no further progress.
    #[inline]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Canceled)
    }
}

/// One published snapshot of a session's display state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RevealFrame {
    /// Concatenation of the tokens revealed so far.
    pub text: String,
    /// Session status at the time of this frame.
    pub status: SessionStatus,
}

impl RevealFrame {
    /// Text the UI should display for this frame: the revealed prefix
    /// plus a trailing cursor glyph while the session is live.
    pub fn display_text(&self) -> String {
        match self.status {
            SessionStatus::Running | SessionStatus::Paused => {
                format!("{}{}", self.text, CURSOR_GLYPH)
            }
            _ => self.text.clone(),
        }
    }
}

#[derive(Debug)]
enum Command {
    Pause,
    Resume,
    Stop,
}

/// A live typewriter reveal of one message.
///
/// The session owns a background task that appends one token per
/// timer tick and publishes [`RevealFrame`]s through a watch channel.
/// It is a value object owned by whatever component displays the
/// message: dropping it (or calling [`RevealSession::stop`]) cancels
/// the reveal without marking the message animated, and the last
/// published partial prefix stands.
///
/// Completion fires the `on_complete` callback exactly once; that is
/// the hook the animation tracker uses to flip `has_animated`.
pub struct RevealSession {
    message_id: MessageId,
    cmd_tx: mpsc::UnboundedSender<Command>,
    frame_rx: watch::Receiver<RevealFrame>,
}

impl RevealSession {
    /// Starts revealing `content` for the message with `message_id`.
    ///
    /// Token 0 is revealed immediately, so the first unit of content
    /// is visible with no delay; subsequent tokens follow on timers.
    /// `on_complete` is invoked (with the message id) only if the
    /// session reaches the end of the token sequence.
    pub fn begin<F>(
        message_id: MessageId,
        content: &str,
        on_complete: F,
    ) -> Self
    where
        F: FnOnce(MessageId) + Send + 'static,
    {
        let tokens = tokenize(content);
        debug!(
            "starting reveal of message {message_id}: {} tokens",
            tokens.len()
        );

        let mut prefix = String::new();
        let mut cursor = 0;
        if let Some(first) = tokens.first() {
            prefix.push_str(&first.text);
            cursor = 1;
        }

        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();

        if cursor == tokens.len() {
            // Zero or one token: the reveal is already over.
            let (frame_tx, frame_rx) = watch::channel(RevealFrame {
                text: prefix,
                status: SessionStatus::Completed,
            });
            drop(frame_tx);
            on_complete(message_id.clone());
            return Self {
                message_id,
                cmd_tx,
                frame_rx,
            };
        }

        let (frame_tx, frame_rx) = watch::channel(RevealFrame {
            text: prefix.clone(),
            status: SessionStatus::Running,
        });
        let task_message_id = message_id.clone();
        tokio::spawn(run_reveal(
            task_message_id,
            tokens,
            prefix,
            cursor,
            frame_tx,
            cmd_rx,
            Box::new(on_complete),
        ));

        Self {
            message_id,
            cmd_tx,
            frame_rx,
        }
    }

    /// The id of the message being revealed.
    #[inline]
    pub fn message_id(&self) -> &MessageId {
        &self.message_id
    }

    /// Suspends the reveal, retaining the cursor for a later resume.
    #[inline]
    pub fn pause(&self) {
        self.cmd_tx.send(Command::Pause).ok();
    }

    /// Resumes a paused reveal.
    ///
    /// The delay for the next token is restarted in full. There is
    /// nothing to resume provider-side: responses are atomic, so this
    /// only continues revealing already-available tokens.
    #[inline]
    pub fn resume(&self) {
        self.cmd_tx.send(Command::Resume).ok();
    }

    /// Cancels the reveal immediately.
    ///
    /// No further token is appended, the pending timer is discarded,
    /// and the message is not marked animated.
    #[inline]
    pub fn stop(&self) {
        self.cmd_tx.send(Command::Stop).ok();
    }

    /// Returns a receiver for the session's frame stream.
    #[inline]
    pub fn frames(&self) -> watch::Receiver<RevealFrame> {
        self.frame_rx.clone()
    }

    /// Returns the latest published frame.
    #[inline]
    pub fn frame(&self) -> RevealFrame {
        self.frame_rx.borrow().clone()
    }

    /// Returns the session's current status.
    #[inline]
    pub fn status(&self) -> SessionStatus {
        self.frame_rx.borrow().status
    }
}

async fn run_reveal(
    message_id: MessageId,
    tokens: Vec<RevealToken>,
    mut prefix: String,
    mut cursor: usize,
    frame_tx: watch::Sender<RevealFrame>,
    mut cmd_rx: mpsc::UnboundedReceiver<Command>,
    on_complete: Box<dyn FnOnce(MessageId) + Send>,
) {
    let mut paused = false;

    loop {
        if paused {
            // No timer is pending while paused; the only way forward
            // is a command (or teardown).
            match cmd_rx.recv().await {
                Some(Command::Resume) => {
                    paused = false;
                    frame_tx.send_replace(RevealFrame {
                        text: prefix.clone(),
                        status: SessionStatus::Running,
                    });
                }
                Some(Command::Pause) => {}
                Some(Command::Stop) | None => {
                    cancel(&message_id, prefix, &frame_tx);
                    return;
                }
            }
            continue;
        }

        let delay = reveal_delay(&tokens[cursor]);
        select! {
            biased;

            cmd = cmd_rx.recv() => match cmd {
                Some(Command::Pause) => {
                    paused = true;
                    frame_tx.send_replace(RevealFrame {
                        text: prefix.clone(),
                        status: SessionStatus::Paused,
                    });
                }
                Some(Command::Resume) => {}
                Some(Command::Stop) | None => {
                    cancel(&message_id, prefix, &frame_tx);
                    return;
                }
            },
            _ = sleep(delay) => {
                prefix.push_str(&tokens[cursor].text);
                cursor += 1;

                if cursor == tokens.len() {
                    trace!("reveal of message {message_id} completed");
                    frame_tx.send_replace(RevealFrame {
                        text: prefix,
                        status: SessionStatus::Completed,
                    });
                    on_complete(message_id);
                    return;
                }
                frame_tx.send_replace(RevealFrame {
                    text: prefix.clone(),
                    status: SessionStatus::Running,
                });
            }
        }
    }
}

/// Ends the session without completion: the partial prefix stays on
/// screen as-is and `on_complete` never fires.
fn cancel(
    message_id: &MessageId,
    prefix: String,
    frame_tx: &watch::Sender<RevealFrame>,
) {
    trace!("reveal of message {message_id} canceled");
    frame_tx.send_replace(RevealFrame {
        text: prefix,
        status: SessionStatus::Canceled,
    });
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    fn completion_counter() -> (Arc<AtomicUsize>, impl FnOnce(MessageId) + Send)
    {
        let counter = Arc::new(AtomicUsize::new(0));
        let counter_clone = Arc::clone(&counter);
        (counter, move |_| {
            counter_clone.fetch_add(1, Ordering::SeqCst);
        })
    }

    async fn wait_for_terminal(
        frames: &mut watch::Receiver<RevealFrame>,
    ) -> RevealFrame {
        loop {
            let frame = frames.borrow_and_update().clone();
            if frame.status.is_terminal() {
                return frame;
            }
            frames.changed().await.unwrap();
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_runs_to_completion() {
        let (completions, on_complete) = completion_counter();
        let content = "Hello, streaming world!";
        let session =
            RevealSession::begin(MessageId::generate(), content, on_complete);

        let mut frames = session.frames();
        let final_frame = wait_for_terminal(&mut frames).await;
        assert_eq!(final_frame.status, SessionStatus::Completed);
        assert_eq!(final_frame.text, content);
        assert_eq!(completions.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_token_visible_immediately() {
        let (_, on_complete) = completion_counter();
        let session = RevealSession::begin(
            MessageId::generate(),
            "First words now",
            on_complete,
        );
        let frame = session.frame();
        assert_eq!(frame.text, "First");
        assert_eq!(frame.status, SessionStatus::Running);
        assert_eq!(frame.display_text(), format!("First{CURSOR_GLYPH}"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_prefix_grows_monotonically() {
        let (_, on_complete) = completion_counter();
        let content = "one two three four five.";
        let session =
            RevealSession::begin(MessageId::generate(), content, on_complete);

        let mut frames = session.frames();
        let mut last = frames.borrow_and_update().text.clone();
        loop {
            let frame = frames.borrow_and_update().clone();
            assert!(
                frame.text.starts_with(&last),
                "prefix shrank: {last:?} -> {:?}",
                frame.text
            );
            last = frame.text;
            if frame.status.is_terminal() {
                break;
            }
            frames.changed().await.unwrap();
        }
        assert_eq!(last, content);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_keeps_partial_prefix() {
        let (completions, on_complete) = completion_counter();
        let content = "a long message that will be interrupted midway";
        let session =
            RevealSession::begin(MessageId::generate(), content, on_complete);
        session.stop();

        let mut frames = session.frames();
        let final_frame = wait_for_terminal(&mut frames).await;
        assert_eq!(final_frame.status, SessionStatus::Canceled);
        assert!(final_frame.text.len() < content.len());
        assert!(content.starts_with(&final_frame.text));
        // No glyph once the session is over.
        assert_eq!(final_frame.display_text(), final_frame.text);
        assert_eq!(completions.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_cancels_without_completion() {
        let (completions, on_complete) = completion_counter();
        let session = RevealSession::begin(
            MessageId::generate(),
            "text that never finishes revealing",
            on_complete,
        );
        let mut frames = session.frames();
        drop(session);

        let final_frame = wait_for_terminal(&mut frames).await;
        assert_eq!(final_frame.status, SessionStatus::Canceled);
        assert_eq!(completions.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_pause_and_resume() {
        let (completions, on_complete) = completion_counter();
        let content = "pause me please, thanks!";
        let session =
            RevealSession::begin(MessageId::generate(), content, on_complete);
        session.pause();

        let mut frames = session.frames();
        frames
            .wait_for(|frame| frame.status == SessionStatus::Paused)
            .await
            .unwrap();
        let paused_text = frames.borrow().text.clone();

        // Time passes, nothing moves while paused.
        tokio::time::sleep(std::time::Duration::from_secs(5)).await;
        assert_eq!(session.frame().text, paused_text);
        assert_eq!(session.status(), SessionStatus::Paused);

        session.resume();
        let final_frame = wait_for_terminal(&mut frames).await;
        assert_eq!(final_frame.status, SessionStatus::Completed);
        assert_eq!(final_frame.text, content);
        assert_eq!(completions.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_single_token_completes_at_begin() {
        let (completions, on_complete) = completion_counter();
        let session =
            RevealSession::begin(MessageId::generate(), "Hi", on_complete);
        assert_eq!(session.status(), SessionStatus::Completed);
        assert_eq!(session.frame().text, "Hi");
        assert_eq!(completions.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_content_completes_at_begin() {
        let (completions, on_complete) = completion_counter();
        let session =
            RevealSession::begin(MessageId::generate(), "", on_complete);
        assert_eq!(session.status(), SessionStatus::Completed);
        assert_eq!(session.frame().text, "");
        assert_eq!(completions.load(Ordering::SeqCst), 1);
    }
}
