use color_eyre::eyre::Result;
use ratatui::prelude::Rect;

use crate::{
    core::{
        msg::{Msg, SystemMsg},
        raw_msg::RawMsg,
    },
    infrastructure::tui::{Event, TuiLike},
    integration::runtime::Runtime,
    presentation,
};

/// Drives the interactive terminal UI
///
/// Terminal events become raw messages for the runtime, the update cycle runs after each
/// event and the screen is redrawn from the resulting state.
pub struct AppRunner<T: TuiLike> {
    runtime: Runtime,
    tui: T,
}

impl<T: TuiLike> AppRunner<T> {
    pub fn new(runtime: Runtime, tui: T) -> Self {
        Self { runtime, tui }
    }

    pub fn runtime(&self) -> &Runtime {
        &self.runtime
    }

    pub fn tui(&self) -> &T {
        &self.tui
    }

    /// Run until the state asks to quit or the terminal stops producing events
    pub async fn run(&mut self) -> Result<()> {
        self.tui.enter()?;

        let (width, height) = self.tui.size()?;
        self.runtime.send_raw_msg(RawMsg::Resize(width, height));
        self.runtime.send_msg(Msg::System(SystemMsg::FeedMounted));
        self.cycle();
        self.render()?;

        while !self.runtime.state().system.should_quit {
            let Some(event) = self.tui.next().await else {
                break;
            };
            match event {
                Event::Resize(width, height) => {
                    self.tui.resize(Rect::new(0, 0, width, height))?;
                    self.runtime.send_raw_msg(RawMsg::Resize(width, height));
                }
                Event::Key(key) => self.runtime.send_raw_msg(RawMsg::Key(key)),
                Event::Paste(text) => self.runtime.send_raw_msg(RawMsg::Paste(text)),
                Event::Tick => self.runtime.send_raw_msg(RawMsg::Tick),
                Event::Quit | Event::Closed => self.runtime.send_raw_msg(RawMsg::Quit),
                Event::Error => self
                    .runtime
                    .send_raw_msg(RawMsg::Error("Terminal input failed".into())),
                Event::Render
                | Event::Init
                | Event::FocusGained
                | Event::FocusLost
                | Event::Mouse(_) => {}
            }

            self.cycle();
            self.render()?;
        }

        self.tui.exit()
    }

    fn cycle(&mut self) {
        if let Err(e) = self.runtime.run_update_cycle() {
            log::error!("Update cycle failed: {e}");
        }
    }

    fn render(&mut self) -> Result<()> {
        let state = self.runtime.state();
        self.tui
            .draw(&mut |frame| presentation::render(frame, state))
    }
}
