// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Simulation-control interactions (end, pause, resume).

use crate::error::Result;
use crate::handle::InteractionClassHandle;
use crate::rti::Ambassador;

/// Interaction class ending the simulation.
pub const SIM_END: &str = "SimEnd";
/// Interaction class suspending stepping.
pub const SIM_PAUSE: &str = "SimPause";
/// Interaction class resuming stepping.
pub const SIM_RESUME: &str = "SimResume";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimCommand {
    End,
    Pause,
    Resume,
}

impl SimCommand {
    pub const fn class_name(self) -> &'static str {
        match self {
            SimCommand::End => SIM_END,
            SimCommand::Pause => SIM_PAUSE,
            SimCommand::Resume => SIM_RESUME,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Handles {
    end: InteractionClassHandle,
    pause: InteractionClassHandle,
    resume: InteractionClassHandle,
}

/// Runner-side simulation-control state.
#[derive(Debug, Default)]
pub(crate) struct SimControl {
    handles: Option<Handles>,
    paused: bool,
    ended: bool,
}

impl SimControl {
    pub(crate) fn subscribe(&mut self, ambassador: &mut Ambassador) -> Result<()> {
        self.handles = Some(Handles {
            end: ambassador.subscribe_interaction(SIM_END)?,
            pause: ambassador.subscribe_interaction(SIM_PAUSE)?,
            resume: ambassador.subscribe_interaction(SIM_RESUME)?,
        });
        log::debug!("[sim-control] subscribed");
        Ok(())
    }

    pub(crate) fn classify(&self, class: InteractionClassHandle) -> Option<SimCommand> {
        let handles = self.handles?;
        if class == handles.end {
            Some(SimCommand::End)
        } else if class == handles.pause {
            Some(SimCommand::Pause)
        } else if class == handles.resume {
            Some(SimCommand::Resume)
        } else {
            None
        }
    }

    pub(crate) fn apply(&mut self, command: SimCommand) {
        match command {
            SimCommand::End => self.ended = true,
            SimCommand::Pause => self.paused = true,
            SimCommand::Resume => self.paused = false,
        }
        log::info!("[sim-control] {:?} (paused={}, ended={})", command, self.paused, self.ended);
    }

    pub(crate) fn is_paused(&self) -> bool {
        self.paused && !self.ended
    }

    pub(crate) fn is_ended(&self) -> bool {
        self.ended
    }
}
