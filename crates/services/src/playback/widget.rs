/// Contract for the embedded video-playback widget.
///
/// The widget is an external collaborator: it decodes and renders on its own,
/// reports state through callbacks (ready, duration, play, pause, ended,
/// progress, error) that the session forwards into the controller, and
/// accepts the queries below.
pub trait PlayerWidget: Send + Sync {
    /// Current playback position in seconds.
    fn current_time(&self) -> f64;

    /// Total duration in seconds, or 0 when not yet known.
    fn duration(&self) -> f64;

    /// Jump playback to the given position in seconds.
    fn seek_to(&self, seconds: f64);
}
