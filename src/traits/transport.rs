//! Client transport abstraction.
//!
//! Commands arrive from a client connection (serial, WiFi socket, ...) and
//! responses go back as complete protocol lines such as `<O>` or
//! `<H 5 1>`. Framing and delivery belong to the transport.

/// Destination for protocol response lines.
///
/// Sending is fire-and-forget; a transport that loses its client simply
/// discards the line.
pub trait ResponseSink {
    /// Deliver one complete response line.
    fn send(&mut self, line: &str);
}

impl<R: ResponseSink + ?Sized> ResponseSink for &mut R {
    fn send(&mut self, line: &str) {
        (**self).send(line);
    }
}

impl ResponseSink for Vec<String> {
    fn send(&mut self, line: &str) {
        self.push(line.to_string());
    }
}
