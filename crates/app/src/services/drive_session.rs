//! Drive session — owns the robot state for the lifetime of one connection.
//!
//! The session seeds its state from the robot, turns operator lines into
//! state transitions, mirrors each new state to the robot and disconnects
//! exactly once when input runs out.

use std::future::Future;

use ddd_domain::command::Command;
use ddd_domain::error::{DddError, UnknownCommandError};
use ddd_domain::robot::RobotState;

use crate::ports::{CommandSource, RobotLink};

/// What happened to a single line of operator input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    /// The line was a command; `state` is what was written to the robot.
    Applied {
        /// The parsed command.
        command: Command,
        /// State after the transition.
        state: RobotState,
    },
    /// The line was not a command. Nothing changed and nothing was written.
    Rejected(UnknownCommandError),
}

/// An open connection to the robot plus the state mirrored to it.
pub struct DriveSession<L> {
    link: L,
    state: RobotState,
    closed: bool,
}

impl<L: RobotLink> DriveSession<L> {
    /// Wrap a link with the default state (LED off, stopped), without reading.
    pub fn new(link: L) -> Self {
        Self {
            link,
            state: RobotState::default(),
            closed: false,
        }
    }

    /// Wrap a link and seed the state with one read of the characteristic.
    ///
    /// Short or empty values decode to the default state. The read is not
    /// retried.
    ///
    /// # Errors
    ///
    /// Returns the link error when the read fails. The link is disconnected
    /// before returning.
    #[tracing::instrument(skip(link))]
    pub async fn open(link: L) -> Result<Self, DddError> {
        let mut session = Self::new(link);

        match session.link.read().await {
            Ok(data) => {
                tracing::info!(value = ?data, "initial value");
                session.state = RobotState::from_payload(&data);
                Ok(session)
            }
            Err(err) => {
                tracing::error!(%err, "initial read failed");
                if let Err(close_err) = session.close().await {
                    tracing::warn!(err = %close_err, "failed to disconnect after read failure");
                }
                Err(err)
            }
        }
    }

    /// Current in-memory state.
    #[must_use]
    pub fn state(&self) -> RobotState {
        self.state
    }

    #[cfg(test)]
    fn is_closed(&self) -> bool {
        self.closed
    }

    /// Apply one line of operator input.
    ///
    /// Recognised commands update the state and write the full 3-byte value.
    /// A failed write is logged and otherwise ignored, leaving the in-memory
    /// state updated. Unrecognised lines are logged and change nothing.
    ///
    /// # Errors
    ///
    /// Returns [`DddError::SessionClosed`] once the session is closed.
    pub async fn handle_line(&mut self, line: &str) -> Result<CommandOutcome, DddError> {
        if self.closed {
            return Err(DddError::SessionClosed);
        }

        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(err) => {
                tracing::warn!("{err}");
                return Ok(CommandOutcome::Rejected(err));
            }
        };

        self.state = self.state.apply(command);
        tracing::info!(%command, state = %self.state, "writing new values");

        if let Err(err) = self.link.write(self.state.to_payload()).await {
            tracing::warn!(%err, "failed to write robot state");
        }

        Ok(CommandOutcome::Applied {
            command,
            state: self.state,
        })
    }

    /// Run the command loop until `source` is exhausted, then disconnect.
    ///
    /// # Errors
    ///
    /// Returns the source error if reading input fails, otherwise any error
    /// from disconnecting. The link is disconnected in both cases.
    pub async fn run<C: CommandSource>(&mut self, source: &mut C) -> Result<(), DddError> {
        self.run_until(source, std::future::pending()).await
    }

    /// Run the command loop until `source` is exhausted or `shutdown`
    /// completes, whichever comes first, then disconnect.
    ///
    /// `shutdown` only interrupts reading and applying lines. The disconnect
    /// always runs to completion.
    ///
    /// # Errors
    ///
    /// Same as [`run`](Self::run). An interruption is not an error.
    #[tracing::instrument(skip_all)]
    pub async fn run_until<C, F>(&mut self, source: &mut C, shutdown: F) -> Result<(), DddError>
    where
        C: CommandSource,
        F: Future<Output = ()>,
    {
        let outcome = tokio::select! {
            outcome = self.drain(source) => outcome,
            () = shutdown => {
                tracing::info!("interrupted");
                Ok(())
            }
        };
        tracing::info!("Exiting");
        let closed = self.close().await;
        outcome.and(closed)
    }

    async fn drain<C: CommandSource>(&mut self, source: &mut C) -> Result<(), DddError> {
        while let Some(line) = source.next_line().await? {
            self.handle_line(&line).await?;
        }
        Ok(())
    }

    /// Disconnect from the robot. Only the first call reaches the link.
    ///
    /// # Errors
    ///
    /// Returns the link error if disconnecting fails. The session counts as
    /// closed either way.
    pub async fn close(&mut self) -> Result<(), DddError> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        self.link.disconnect().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ddd_domain::robot::{PAYLOAD_LEN, SPEED};
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};
    use tokio::sync::oneshot;

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum LinkCall {
        Read,
        Write([u8; PAYLOAD_LEN]),
        Disconnect,
    }

    #[derive(Clone, Default)]
    struct FakeLink {
        calls: Arc<Mutex<Vec<LinkCall>>>,
        initial: Option<Vec<u8>>,
        fail_writes: bool,
    }

    impl FakeLink {
        fn with_initial(data: &[u8]) -> Self {
            Self {
                initial: Some(data.to_vec()),
                ..Self::default()
            }
        }

        fn calls(&self) -> Vec<LinkCall> {
            self.calls.lock().unwrap().clone()
        }

        fn writes(&self) -> Vec<[u8; PAYLOAD_LEN]> {
            self.calls()
                .into_iter()
                .filter_map(|call| match call {
                    LinkCall::Write(payload) => Some(payload),
                    _ => None,
                })
                .collect()
        }

        fn disconnects(&self) -> usize {
            self.calls()
                .iter()
                .filter(|call| **call == LinkCall::Disconnect)
                .count()
        }
    }

    fn broken_pipe() -> DddError {
        DddError::Transport(Box::new(std::io::Error::from(
            std::io::ErrorKind::BrokenPipe,
        )))
    }

    impl RobotLink for FakeLink {
        fn read(&self) -> impl Future<Output = Result<Vec<u8>, DddError>> + Send {
            self.calls.lock().unwrap().push(LinkCall::Read);
            let initial = self.initial.clone();
            async move { initial.ok_or_else(broken_pipe) }
        }

        fn write(
            &self,
            payload: [u8; PAYLOAD_LEN],
        ) -> impl Future<Output = Result<(), DddError>> + Send {
            self.calls.lock().unwrap().push(LinkCall::Write(payload));
            let fail = self.fail_writes;
            async move { if fail { Err(broken_pipe()) } else { Ok(()) } }
        }

        fn disconnect(&self) -> impl Future<Output = Result<(), DddError>> + Send {
            self.calls.lock().unwrap().push(LinkCall::Disconnect);
            async { Ok(()) }
        }
    }

    struct ScriptedInput {
        lines: VecDeque<Result<String, DddError>>,
    }

    impl ScriptedInput {
        fn new(lines: &[&str]) -> Self {
            Self {
                lines: lines.iter().map(|line| Ok((*line).to_string())).collect(),
            }
        }
    }

    impl CommandSource for ScriptedInput {
        fn next_line(&mut self) -> impl Future<Output = Result<Option<String>, DddError>> + Send {
            let next = self.lines.pop_front().transpose();
            async { next }
        }
    }

    fn state(led_on: bool, left_drive: i8, right_drive: i8) -> RobotState {
        RobotState {
            led_on,
            left_drive,
            right_drive,
        }
    }

    #[tokio::test]
    async fn should_seed_state_from_initial_read() {
        let link = FakeLink::with_initial(&[1, 30, (-30_i8).to_ne_bytes()[0]]);
        let session = DriveSession::open(link.clone()).await.unwrap();

        assert_eq!(session.state(), state(true, 30, -30));
        assert_eq!(link.calls(), vec![LinkCall::Read]);
    }

    #[tokio::test]
    async fn should_seed_default_state_from_empty_read() {
        let session = DriveSession::open(FakeLink::with_initial(&[])).await.unwrap();
        assert_eq!(session.state(), RobotState::default());
    }

    #[tokio::test]
    async fn should_disconnect_when_initial_read_fails() {
        let link = FakeLink::default();
        let result = DriveSession::open(link.clone()).await;

        assert!(matches!(result, Err(DddError::Transport(_))));
        assert_eq!(link.calls(), vec![LinkCall::Read, LinkCall::Disconnect]);
    }

    #[tokio::test]
    async fn should_write_state_after_each_command() {
        let link = FakeLink::with_initial(&[0, 0, 0]);
        let mut session = DriveSession::open(link.clone()).await.unwrap();

        let outcome = session.handle_line("on").await.unwrap();
        assert_eq!(
            outcome,
            CommandOutcome::Applied {
                command: Command::LedOn,
                state: state(true, 0, 0),
            }
        );

        session.handle_line("l").await.unwrap();
        assert_eq!(session.state(), state(true, SPEED, -SPEED));

        assert_eq!(link.writes(), vec![[1, 0, 0], [1, 50, 0xce]]);
    }

    #[tokio::test]
    async fn should_match_written_payload_with_state_for_every_command() {
        let link = FakeLink::with_initial(&[]);
        let mut session = DriveSession::open(link.clone()).await.unwrap();

        for keyword in ["f", "off", "b", "on", "r", "l", "on"] {
            session.handle_line(keyword).await.unwrap();
            let last = *link.writes().last().unwrap();
            assert_eq!(last, session.state().to_payload(), "after {keyword}");
        }
    }

    #[tokio::test]
    async fn should_leave_state_untouched_for_invalid_command() {
        let link = FakeLink::with_initial(&[1, 20, 20]);
        let mut session = DriveSession::open(link.clone()).await.unwrap();

        for line in ["", "  ", "forward", "ON", "x", "l r"] {
            let outcome = session.handle_line(line).await.unwrap();
            assert_eq!(
                outcome,
                CommandOutcome::Rejected(UnknownCommandError {
                    input: line.to_string()
                })
            );
            assert_eq!(session.state(), state(true, 20, 20));
        }
        assert!(link.writes().is_empty());
    }

    #[tokio::test]
    async fn should_keep_going_when_write_fails() {
        let mut link = FakeLink::with_initial(&[]);
        link.fail_writes = true;
        let mut session = DriveSession::open(link.clone()).await.unwrap();

        let outcome = session.handle_line("f").await.unwrap();

        assert!(matches!(outcome, CommandOutcome::Applied { .. }));
        assert_eq!(session.state(), state(false, SPEED, SPEED));
    }

    #[tokio::test]
    async fn should_disconnect_once_when_input_closes() {
        let link = FakeLink::with_initial(&[]);
        let mut session = DriveSession::open(link.clone()).await.unwrap();
        let mut input = ScriptedInput::new(&["f", "bogus", "on"]);

        session.run(&mut input).await.unwrap();

        assert_eq!(
            link.calls(),
            vec![
                LinkCall::Read,
                LinkCall::Write([0, 50, 50]),
                LinkCall::Write([1, 50, 50]),
                LinkCall::Disconnect,
            ]
        );
        assert!(session.is_closed());
    }

    #[tokio::test]
    async fn should_refuse_writes_after_close() {
        let link = FakeLink::with_initial(&[]);
        let mut session = DriveSession::open(link.clone()).await.unwrap();
        session.run(&mut ScriptedInput::new(&[])).await.unwrap();

        let result = session.handle_line("f").await;

        assert!(matches!(result, Err(DddError::SessionClosed)));
        assert!(link.writes().is_empty());
        assert_eq!(session.state(), RobotState::default());
    }

    #[tokio::test]
    async fn should_disconnect_only_once_when_closed_twice() {
        let link = FakeLink::with_initial(&[]);
        let mut session = DriveSession::open(link.clone()).await.unwrap();

        session.close().await.unwrap();
        session.close().await.unwrap();

        assert_eq!(link.disconnects(), 1);
    }

    #[tokio::test]
    async fn should_disconnect_when_input_fails() {
        let link = FakeLink::with_initial(&[]);
        let mut session = DriveSession::open(link.clone()).await.unwrap();
        let mut input = ScriptedInput::new(&["on"]);
        input.lines.push_back(Err(broken_pipe()));

        let result = session.run(&mut input).await;

        assert!(matches!(result, Err(DddError::Transport(_))));
        assert_eq!(link.disconnects(), 1);
        assert_eq!(link.writes(), vec![[1, 0, 0]]);
    }

    /// Delivers its lines, signals once they are used up, then blocks
    /// forever like an idle terminal.
    struct IdleAfter {
        lines: VecDeque<String>,
        exhausted: Option<oneshot::Sender<()>>,
    }

    impl IdleAfter {
        fn new(lines: &[&str]) -> (Self, oneshot::Receiver<()>) {
            let (tx, rx) = oneshot::channel();
            let input = Self {
                lines: lines.iter().map(|line| (*line).to_string()).collect(),
                exhausted: Some(tx),
            };
            (input, rx)
        }
    }

    impl CommandSource for IdleAfter {
        async fn next_line(&mut self) -> Result<Option<String>, DddError> {
            if let Some(line) = self.lines.pop_front() {
                return Ok(Some(line));
            }
            if let Some(tx) = self.exhausted.take() {
                let _ = tx.send(());
            }
            std::future::pending().await
        }
    }

    #[tokio::test]
    async fn should_disconnect_once_when_interrupted() {
        let link = FakeLink::with_initial(&[]);
        let mut session = DriveSession::open(link.clone()).await.unwrap();
        let (mut input, exhausted) = IdleAfter::new(&["on", "f"]);

        session
            .run_until(&mut input, async {
                exhausted.await.unwrap();
            })
            .await
            .unwrap();

        assert_eq!(
            link.calls(),
            vec![
                LinkCall::Read,
                LinkCall::Write([1, 0, 0]),
                LinkCall::Write([1, 50, 50]),
                LinkCall::Disconnect,
            ]
        );
        assert!(session.is_closed());

        session.close().await.unwrap();
        assert_eq!(link.disconnects(), 1);
    }

    #[tokio::test]
    async fn should_disconnect_when_interrupted_before_any_input() {
        let link = FakeLink::with_initial(&[1, 50, 50]);
        let mut session = DriveSession::open(link.clone()).await.unwrap();
        let (mut input, _exhausted) = IdleAfter::new(&[]);

        session
            .run_until(&mut input, std::future::ready(()))
            .await
            .unwrap();

        assert!(link.writes().is_empty());
        assert_eq!(link.disconnects(), 1);
        assert_eq!(session.state(), state(true, SPEED, SPEED));
    }
}
