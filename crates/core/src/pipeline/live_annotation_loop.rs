use std::fmt;
use std::time::{Duration, Instant};

use thiserror::Error;

use crate::capture::domain::display_surface::{DisplayError, DisplaySurface};
use crate::capture::domain::frame_source::{CaptureError, FrameSource};
use crate::emotion::domain::emotion_analyzer::{AnalysisError, AnalyzeRequest, EmotionAnalyzer};
use crate::emotion::domain::face_analysis::AnalysisRecord;
use crate::overlay::domain::face_annotation::FaceAnnotation;
use crate::overlay::domain::frame_annotator::FrameAnnotator;
use crate::overlay::domain::overlay_style::OverlayStyle;
use crate::shared::constants::{QUIT_POLL_MS, WINDOW_TITLE};
use crate::shared::frame::Frame;

use super::pipeline_logger::{NullPipelineLogger, PipelineLogger};

/// Fatal startup failures. Nothing that happens inside the loop is fatal.
#[derive(Error, Debug)]
pub enum LoopError {
    #[error(transparent)]
    CaptureOpen(CaptureError),
    #[error("failed to set up emotion analyzer: {0}")]
    AnalyzerSetup(#[source] Box<dyn std::error::Error>),
    #[error(transparent)]
    DisplayOpen(DisplayError),
}

/// Why the loop stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StopReason {
    /// Quit key pressed or window closed.
    QuitRequested,
    /// The source reported end of stream.
    EndOfStream,
    CaptureFailed,
    DisplayFailed,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            StopReason::QuitRequested => "quit requested",
            StopReason::EndOfStream => "end of stream",
            StopReason::CaptureFailed => "capture failed",
            StopReason::DisplayFailed => "display failed",
        };
        f.write_str(text)
    }
}

/// Counters for one session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoopSummary {
    pub frames_displayed: usize,
    /// Frames whose analysis failed for a reason other than "no face".
    pub analysis_errors: usize,
    pub detections_annotated: usize,
    /// Records dropped because a required field was missing.
    pub detections_skipped: usize,
    pub render_errors: usize,
    pub stop_reason: StopReason,
}

impl LoopSummary {
    fn new() -> Self {
        Self {
            frames_displayed: 0,
            analysis_errors: 0,
            detections_annotated: 0,
            detections_skipped: 0,
            render_errors: 0,
            stop_reason: StopReason::QuitRequested,
        }
    }
}

/// Capture → analyze → annotate → display, one frame at a time.
///
/// Owns the source and display so it can guarantee both are released
/// exactly once, whichever way the session ends.
pub struct LiveAnnotationLoop {
    source: Box<dyn FrameSource>,
    display: Box<dyn DisplaySurface>,
    annotator: Box<dyn FrameAnnotator>,
    style: OverlayStyle,
    request: AnalyzeRequest,
    logger: Box<dyn PipelineLogger>,
    poll_timeout: Duration,
}

impl LiveAnnotationLoop {
    pub fn new(
        source: Box<dyn FrameSource>,
        display: Box<dyn DisplaySurface>,
        annotator: Box<dyn FrameAnnotator>,
        style: OverlayStyle,
        request: AnalyzeRequest,
    ) -> Self {
        Self {
            source,
            display,
            annotator,
            style,
            request,
            logger: Box::new(NullPipelineLogger),
            poll_timeout: Duration::from_millis(QUIT_POLL_MS),
        }
    }

    pub fn with_logger(mut self, logger: Box<dyn PipelineLogger>) -> Self {
        self.logger = logger;
        self
    }

    /// Runs the session until quit, window close or capture end.
    ///
    /// The camera is opened before `make_analyzer` is called, so a missing
    /// camera never triggers model loading or inference.
    pub fn run<F>(&mut self, make_analyzer: F) -> Result<LoopSummary, LoopError>
    where
        F: FnOnce() -> Result<Box<dyn EmotionAnalyzer>, Box<dyn std::error::Error>>,
    {
        let info = self.source.open().map_err(LoopError::CaptureOpen)?;

        let mut analyzer = match make_analyzer() {
            Ok(analyzer) => analyzer,
            Err(e) => {
                self.source.release();
                return Err(LoopError::AnalyzerSetup(e));
            }
        };

        if let Err(e) = self.display.open(WINDOW_TITLE, info.width, info.height) {
            self.source.release();
            return Err(LoopError::DisplayOpen(e));
        }

        log::info!(
            "Starting live annotation ({}x{}, detector={}). Press 'q' to quit.",
            info.width,
            info.height,
            self.request.detector_backend
        );
        let summary = self.run_frames(analyzer.as_mut());

        self.source.release();
        self.display.close();
        log::info!(
            "Stopped after {} frames ({})",
            summary.frames_displayed,
            summary.stop_reason
        );
        self.logger.summary();
        Ok(summary)
    }

    fn run_frames(&mut self, analyzer: &mut dyn EmotionAnalyzer) -> LoopSummary {
        let mut summary = LoopSummary::new();

        summary.stop_reason = loop {
            let t0 = Instant::now();
            let mut frame = match self.source.read_frame() {
                Ok(Some(frame)) => frame,
                Ok(None) => {
                    log::info!("Could not read frame: end of stream");
                    break StopReason::EndOfStream;
                }
                Err(e) => {
                    log::warn!("Could not read frame: {e}");
                    break StopReason::CaptureFailed;
                }
            };
            self.logger.timing("capture", elapsed_ms(t0));

            let t1 = Instant::now();
            let records = self.analyze(analyzer, &frame, &mut summary);
            self.logger.timing("analyze", elapsed_ms(t1));
            self.logger.metric("faces", records.len() as f64);

            let t2 = Instant::now();
            self.annotate(&mut frame, records, &mut summary);
            self.logger.timing("render", elapsed_ms(t2));

            let t3 = Instant::now();
            if let Err(e) = self.display.present(&frame) {
                log::warn!("Could not display frame {}: {e}", frame.index());
                break StopReason::DisplayFailed;
            }
            summary.frames_displayed += 1;
            self.logger.frame(frame.index());

            let quit = self.display.poll_quit(self.poll_timeout);
            self.logger.timing("display", elapsed_ms(t3));
            if quit {
                break StopReason::QuitRequested;
            }
        };

        summary
    }

    fn analyze(
        &self,
        analyzer: &mut dyn EmotionAnalyzer,
        frame: &Frame,
        summary: &mut LoopSummary,
    ) -> Vec<AnalysisRecord> {
        match analyzer.analyze(frame, &self.request) {
            Ok(records) => records,
            Err(AnalysisError::FaceNotDetected) => Vec::new(),
            Err(e) => {
                log::warn!("Emotion analysis error on frame {}: {e}", frame.index());
                summary.analysis_errors += 1;
                Vec::new()
            }
        }
    }

    fn annotate(&self, frame: &mut Frame, records: Vec<AnalysisRecord>, summary: &mut LoopSummary) {
        for record in records {
            let detection = match record.into_detection() {
                Ok(detection) => detection,
                Err(missing) => {
                    log::debug!(
                        "Skipping face on frame {}: missing {missing}",
                        frame.index()
                    );
                    summary.detections_skipped += 1;
                    continue;
                }
            };

            let annotation = FaceAnnotation::for_detection(&detection, &self.style);
            match self.annotator.annotate(frame, &annotation, &self.style) {
                Ok(()) => summary.detections_annotated += 1,
                Err(e) => {
                    log::warn!("Could not annotate face on frame {}: {e}", frame.index());
                    summary.render_errors += 1;
                }
            }
        }
    }
}

fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}
