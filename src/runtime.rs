// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Headless application shell: owns the model and a pool of command workers.

use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};
use tracing::{debug, warn};

use crate::mvu::{self, AppModel, Command, Msg, Services};

/// Application driver. Messages are applied on the caller's thread; commands
/// run on background workers and report back as messages.
pub struct App {
    model: AppModel,
    cmd_tx: Sender<Command>,
    msg_rx: Receiver<Msg>,
}

impl App {
    /// Spawn `workers` threads (at least one) executing commands against `services`.
    pub fn new(services: Services, workers: usize) -> Self {
        let (cmd_tx, cmd_rx) = crossbeam_channel::unbounded::<Command>();
        let (msg_tx, msg_rx) = crossbeam_channel::unbounded::<Msg>();

        for _ in 0..workers.max(1) {
            let cmd_rx = cmd_rx.clone();
            let msg_tx = msg_tx.clone();
            let services = services.clone();
            std::thread::spawn(move || {
                for cmd in cmd_rx.iter() {
                    let msg = mvu::run_command(cmd, &services);
                    if msg_tx.send(msg).is_err() {
                        break;
                    }
                }
            });
        }

        Self {
            model: AppModel::default(),
            cmd_tx,
            msg_rx,
        }
    }

    pub fn model(&self) -> &AppModel {
        &self.model
    }

    /// Apply a message and hand resulting commands to the workers.
    pub fn send(&mut self, msg: Msg) {
        let mut commands = Vec::new();
        mvu::update(&mut self.model, msg, &mut commands);
        for cmd in commands {
            if self.cmd_tx.send(cmd).is_ok() {
                self.model.pending_commands += 1;
            } else {
                warn!("command workers are gone, dropping command");
            }
        }
    }

    /// Apply every message the workers have produced so far.
    pub fn pump(&mut self) -> usize {
        let mut handled = 0;
        while let Ok(msg) = self.msg_rx.try_recv() {
            self.receive(msg);
            handled += 1;
        }
        handled
    }

    /// Keep applying worker messages until no command is pending.
    ///
    /// Returns `false` if `timeout` elapsed first.
    pub fn run_until_idle(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        while self.model.pending_commands > 0 {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.msg_rx.recv_timeout(remaining) {
                Ok(msg) => self.receive(msg),
                Err(RecvTimeoutError::Timeout) => {
                    debug!(pending = self.model.pending_commands, "still busy at deadline");
                    return false;
                }
                Err(RecvTimeoutError::Disconnected) => return false,
            }
        }
        true
    }

    fn receive(&mut self, msg: Msg) {
        self.model.pending_commands = self.model.pending_commands.saturating_sub(1);
        self.send(msg);
    }
}
