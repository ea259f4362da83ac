use anyhow::Result;
use chrono::{DateTime, Utc};
use nmea0183::{ParseResult, Parser, Sentence};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, warn};

use super::{CachedLocation, Fix};

/// Parses GGA sentences from a GPS receiver and records each position in a cache.
pub struct NmeaFeed {
    cache: CachedLocation,
    parser: Parser,
}

impl NmeaFeed {
    /// A feed writing into `cache`.
    pub fn new(cache: CachedLocation) -> Self {
        Self {
            cache,
            // GGA carries the position fix; everything else is noise for us
            parser: Parser::new().sentence_only(Sentence::GGA),
        }
    }

    /// Parse one raw sentence as read off the receiver. Returns the fix
    /// recorded from it, if any. Bytes that are not valid UTF-8 are left for
    /// the parser to reject.
    pub fn ingest_bytes(&mut self, line: &[u8], received_at: DateTime<Utc>) -> Option<Fix> {
        let mut end = line.len();
        while end > 0 && line[end - 1].is_ascii_whitespace() {
            end -= 1;
        }
        let line = &line[..end];
        if line.is_empty() {
            return None;
        }

        // the parser only emits a sentence once it sees CRLF
        let mut sentence = Vec::with_capacity(line.len() + 2);
        sentence.extend_from_slice(line);
        sentence.extend_from_slice(b"\r\n");

        let mut recorded = None;
        for result in self.parser.parse_from_bytes(&sentence) {
            match result {
                Ok(ParseResult::GGA(Some(gga))) => {
                    let fix = Fix::new(gga.latitude.as_f64(), gga.longitude.as_f64(), received_at);
                    self.cache.update(fix);
                    recorded = Some(fix);
                }
                Ok(ParseResult::GGA(None)) => debug!("GGA sentence without a position fix"),
                Ok(_) => {}
                Err(error) => warn!(
                    %error,
                    sentence = %String::from_utf8_lossy(line),
                    "NMEA parse error"
                ),
            }
        }

        recorded
    }

    /// Consume `reader` line by line until EOF. Returns how many fixes were recorded.
    pub async fn run<R: AsyncBufRead + Unpin>(mut self, mut reader: R) -> Result<usize> {
        let mut line = Vec::new();
        let mut recorded = 0;

        while next_line(&mut reader, &mut line).await? {
            if self.ingest_bytes(&line, Utc::now()).is_some() {
                recorded += 1;
            }
        }

        debug!(recorded, "NMEA feed reached end of input");
        Ok(recorded)
    }

    /// Read until the first fix is recorded or the input ends. Receivers
    /// behind a serial device never reach EOF, so this is the way to take a
    /// single reading from one.
    pub async fn first_fix<R: AsyncBufRead + Unpin>(
        mut self,
        mut reader: R,
    ) -> Result<Option<Fix>> {
        let mut line = Vec::new();

        while next_line(&mut reader, &mut line).await? {
            if let Some(fix) = self.ingest_bytes(&line, Utc::now()) {
                return Ok(Some(fix));
            }
        }

        debug!("NMEA feed ended before a fix arrived");
        Ok(None)
    }
}

/// Fill `line` with the next `\n`-terminated chunk. False at EOF.
async fn next_line<R: AsyncBufRead + Unpin>(
    reader: &mut R,
    line: &mut Vec<u8>,
) -> Result<bool> {
    line.clear();
    Ok(reader.read_until(b'\n', line).await? > 0)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::io::{AsyncWriteExt, BufReader};

    use super::*;
    use crate::location::LocationProvider;

    const DUBLIN: &str = "$GPGGA,092750.000,5321.6802,N,00630.3372,W,1,8,1.03,61.7,M,55.2,M,,*76";
    const PHILADELPHIA: &str = "$GPGGA,000000.00,4000.0000,N,07500.0000,W,1,08,0.9,10.0,M,0.0,M,,*78";

    #[test]
    fn test_ingest_gga_records_fix() {
        let cache = CachedLocation::new();
        let mut feed = NmeaFeed::new(cache.clone());
        let received_at = DateTime::parse_from_rfc3339("2024-01-01T00:00:00Z")
            .expect("it's a valid date")
            .into();

        let fix = feed
            .ingest_bytes(DUBLIN.as_bytes(), received_at)
            .expect("GGA sentence carries a fix");

        assert!((fix.coordinate.latitude - 53.361336).abs() < 1e-5);
        assert!((fix.coordinate.longitude + 6.505620).abs() < 1e-5);
        assert_eq!(fix.timestamp, received_at);
        assert_eq!(cache.current_location(), Some(fix));
    }

    #[test]
    fn test_ingest_garbage_leaves_cache_empty() {
        let cache = CachedLocation::new();
        let mut feed = NmeaFeed::new(cache.clone());

        assert_eq!(feed.ingest_bytes(b"$GPGGA,not,a,sentence*00", Utc::now()), None);
        assert_eq!(feed.ingest_bytes(b"", Utc::now()), None);
        assert_eq!(cache.current_location(), None);
    }

    #[tokio::test]
    async fn test_run_keeps_latest_fix() {
        let cache = CachedLocation::new();
        let input = format!("{DUBLIN}\r\nnoise\r\n{PHILADELPHIA}\r\n");

        let recorded = NmeaFeed::new(cache.clone())
            .run(input.as_bytes())
            .await
            .unwrap();

        assert_eq!(recorded, 2);
        let fix = cache.current_location().unwrap();
        assert!((fix.coordinate.latitude - 40.0).abs() < 1e-9);
        assert!((fix.coordinate.longitude + 75.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_run_skips_line_noise() {
        let cache = CachedLocation::new();
        let mut input = b"\xff\xfe\r\n".to_vec();
        input.extend_from_slice(PHILADELPHIA.as_bytes());
        input.extend_from_slice(b"\r\n");

        let recorded = NmeaFeed::new(cache.clone())
            .run(input.as_slice())
            .await
            .unwrap();

        assert_eq!(recorded, 1);
        assert!(cache.current_location().is_some());
    }

    #[tokio::test]
    async fn test_first_fix_returns_without_eof() {
        let cache = CachedLocation::new();
        let (mut receiver, device) = tokio::io::duplex(1024);

        receiver
            .write_all(format!("noise\r\n{DUBLIN}\r\n").as_bytes())
            .await
            .unwrap();

        // `receiver` stays open, like a serial port that keeps streaming
        let fix = tokio::time::timeout(
            Duration::from_secs(5),
            NmeaFeed::new(cache.clone()).first_fix(BufReader::new(device)),
        )
        .await
        .expect("a fix arrives before the input ends")
        .unwrap()
        .expect("GGA sentence carries a fix");

        assert!((fix.coordinate.latitude - 53.361336).abs() < 1e-5);
        assert_eq!(cache.current_location(), Some(fix));
        drop(receiver);
    }

    #[tokio::test]
    async fn test_first_fix_at_eof_without_fix() {
        let cache = CachedLocation::new();

        let fix = NmeaFeed::new(cache.clone())
            .first_fix("noise\r\n".as_bytes())
            .await
            .unwrap();

        assert_eq!(fix, None);
        assert_eq!(cache.current_location(), None);
    }
}
