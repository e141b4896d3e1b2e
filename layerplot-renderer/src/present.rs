use std::io;

use crate::render_data::RenderFrame;
use crate::surface::{Axes, Figure};

/// Presents a finished surface to the user.
///
/// Implementations may block until the viewer is dismissed.
pub trait Presenter {
    fn present(&mut self, figure: &Figure, axes: &Axes) -> io::Result<()>;
}

/// Presenter for environments without a display: logs a summary of the
/// frame and returns immediately.
#[derive(Debug, Default, Clone, Copy)]
pub struct HeadlessPresenter;

impl Presenter for HeadlessPresenter {
    fn present(&mut self, figure: &Figure, axes: &Axes) -> io::Result<()> {
        let frame = RenderFrame::capture(figure, axes);
        log::info!(
            "Figure {} ({}x{} px): {} layer(s), view x {:.3}..{:.3}, y {:.3}..{:.3}",
            frame.figure_id,
            frame.width_px,
            frame.height_px,
            frame.commands.len(),
            frame.view.min.x,
            frame.view.max.x,
            frame.view.min.y,
            frame.view.max.y,
        );
        for command in &frame.commands {
            log::info!("  {}", command);
        }
        Ok(())
    }
}

/// Presenter that writes the frame as JSON to any writer, e.g. stdout for a
/// viewer process reading from a pipe.
pub struct JsonPresenter<W: io::Write> {
    writer: W,
}

impl<W: io::Write> JsonPresenter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: io::Write> Presenter for JsonPresenter<W> {
    fn present(&mut self, figure: &Figure, axes: &Axes) -> io::Result<()> {
        let frame = RenderFrame::capture(figure, axes);
        serde_json::to_writer(&mut self.writer, &frame)?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()
    }
}
