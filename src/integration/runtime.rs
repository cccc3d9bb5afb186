use std::{collections::VecDeque, time::Duration};

use color_eyre::eyre::{bail, eyre, Result};
use tokio::sync::mpsc;

use crate::{
    core::{
        cmd::Cmd,
        msg::{Msg, SessionMsg},
        raw_msg::RawMsg,
        state::AppState,
        translator::translate_raw_to_domain,
        update::update,
    },
    infrastructure::{cmd_executor::CmdExecutor, config::Config},
};

/// How long headless callers wait for a state condition by default
pub const DEFAULT_WAIT: Duration = Duration::from_secs(60);

/// Owns the application state and drives the update loop
///
/// Messages come from the internal queue (raw input, direct sends) and from the channel the
/// command executor posts results to. Commands returned by `update` are queued and handed to
/// the executor by [`Runtime::execute_pending_commands`].
pub struct Runtime {
    state: AppState,
    msg_queue: VecDeque<Msg>,
    raw_msg_queue: VecDeque<RawMsg>,
    cmd_queue: VecDeque<Cmd>,
    msg_tx: mpsc::UnboundedSender<Msg>,
    msg_rx: mpsc::UnboundedReceiver<Msg>,
    cmd_executor: Option<CmdExecutor>,
    wait: Duration,
}

impl Runtime {
    /// Create a runtime without an executor; commands only queue up
    pub fn new(initial_state: AppState) -> Self {
        let (msg_tx, msg_rx) = mpsc::unbounded_channel();
        Self {
            state: initial_state,
            msg_queue: VecDeque::new(),
            raw_msg_queue: VecDeque::new(),
            cmd_queue: VecDeque::new(),
            msg_tx,
            msg_rx,
            cmd_executor: None,
            wait: DEFAULT_WAIT,
        }
    }

    /// Create a runtime talking to the services named in `config`
    pub fn from_config(config: &Config) -> Result<Self> {
        let mut runtime = Self::new(AppState::new(config));
        let executor = CmdExecutor::from_config(config, runtime.sender())?;
        runtime.set_executor(executor);
        // Image generation followed by post creation is the longest chain of requests
        runtime.wait = config.api.timeout() * 3;
        Ok(runtime)
    }

    pub fn set_executor(&mut self, executor: CmdExecutor) {
        self.cmd_executor = Some(executor);
    }

    pub fn executor(&self) -> Option<&CmdExecutor> {
        self.cmd_executor.as_ref()
    }

    /// Sender for messages produced outside the runtime
    pub fn sender(&self) -> mpsc::UnboundedSender<Msg> {
        self.msg_tx.clone()
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn send_msg(&mut self, msg: Msg) {
        self.msg_queue.push_back(msg);
    }

    pub fn send_raw_msg(&mut self, raw_msg: RawMsg) {
        self.raw_msg_queue.push_back(raw_msg);
    }

    /// Take the queued commands
    pub fn pending_commands(&mut self) -> Vec<Cmd> {
        self.cmd_queue.drain(..).collect()
    }

    /// Hand every queued command to the executor
    pub fn execute_pending_commands(&mut self) -> Result<Vec<String>> {
        if self.cmd_queue.is_empty() {
            return Ok(vec![]);
        }
        let Some(executor) = &self.cmd_executor else {
            return Err(eyre!(
                "No command executor available. Use set_executor() to configure."
            ));
        };
        let commands: Vec<Cmd> = self.cmd_queue.drain(..).collect();
        Ok(executor.execute_commands(commands))
    }

    pub fn process_message(&mut self, msg: Msg) -> Vec<Cmd> {
        let commands = update(msg, &mut self.state);
        self.cmd_queue.extend(commands.iter().cloned());
        commands
    }

    /// Translate raw input, then apply every queued and received message
    pub fn process_all_messages(&mut self) -> Vec<Cmd> {
        let mut all_commands = Vec::new();

        while let Some(raw_msg) = self.raw_msg_queue.pop_front() {
            if !raw_msg.is_frequent() {
                log::trace!("raw message: {raw_msg:?}");
            }
            let domain_msgs = translate_raw_to_domain(raw_msg, &self.state);
            self.msg_queue.extend(domain_msgs);
        }

        while let Some(msg) = self.msg_queue.pop_front() {
            all_commands.extend(self.process_message(msg));
        }

        while let Ok(msg) = self.msg_rx.try_recv() {
            all_commands.extend(self.process_message(msg));
        }

        all_commands
    }

    /// Process all messages and execute the resulting commands
    pub fn run_update_cycle(&mut self) -> Result<Vec<String>> {
        self.process_all_messages();
        self.execute_pending_commands()
    }

    /// Keep processing results until `done` holds for the state
    ///
    /// Fails when nothing satisfying `done` arrives within the runtime's wait limit.
    pub async fn run_until<P>(&mut self, done: P) -> Result<()>
    where
        P: Fn(&AppState) -> bool,
    {
        let deadline = tokio::time::Instant::now() + self.wait;
        loop {
            self.run_update_cycle()?;
            if done(&self.state) {
                return Ok(());
            }
            match tokio::time::timeout_at(deadline, self.msg_rx.recv()).await {
                Ok(Some(msg)) => self.msg_queue.push_back(msg),
                Ok(None) => bail!("message channel closed"),
                Err(_) => bail!("no response within {}s", self.wait.as_secs()),
            }
        }
    }

    /// Run until no command is in flight and every result has been applied
    pub async fn run_to_idle(&mut self) -> Result<()> {
        loop {
            self.run_update_cycle()?;
            let Some(executor) = self.cmd_executor.clone() else {
                return Ok(());
            };
            if executor.pending() == 0 && self.msg_rx.is_empty() {
                return Ok(());
            }
            tokio::time::timeout(self.wait, executor.wait_idle())
                .await
                .map_err(|_| eyre!("commands still running after {}s", self.wait.as_secs()))?;
        }
    }

    /// Log back in with the session saved by a previous run, if any
    pub async fn restore_session(&mut self) -> Result<bool> {
        let Some(executor) = &self.cmd_executor else {
            return Ok(false);
        };
        let saved = executor.sessions().load().await?;
        match saved {
            Some(saved) => {
                log::info!("Restored the session of {:?}", saved.username);
                self.send_msg(Msg::Session(SessionMsg::Restored {
                    token: saved.token,
                    username: saved.username,
                }));
                self.process_all_messages();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn stats(&self) -> RuntimeStats {
        RuntimeStats {
            queued_messages: self.msg_queue.len() + self.raw_msg_queue.len(),
            queued_commands: self.cmd_queue.len(),
            running_commands: self
                .cmd_executor
                .as_ref()
                .map(CmdExecutor::pending)
                .unwrap_or(0),
            feed_len: self.state.feed.len(),
            is_feed_loading: self.state.feed.is_loading(),
            has_more: self.state.feed.has_more(),
            is_logged_in: self.state.session.is_logged_in(),
            has_executor: self.cmd_executor.is_some(),
        }
    }
}

/// Runtime statistics
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeStats {
    pub queued_messages: usize,
    pub queued_commands: usize,
    pub running_commands: usize,
    pub feed_len: usize,
    pub is_feed_loading: bool,
    pub has_more: bool,
    pub is_logged_in: bool,
    pub has_executor: bool,
}
