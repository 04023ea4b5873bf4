//! Head-pose sample sources
//!
//! A source hands out [`OrientationSample`]s one at a time: a UDP listener
//! for head trackers speaking the opentrack protocol, a JSONL replay file,
//! a synthetic sweep for demos, and a scripted source for tests.

use std::fs::File;
use std::io::{BufRead, BufReader, ErrorKind, Lines};
use std::net::UdpSocket;
use std::path::Path;
use std::time::{Duration, Instant};

use log::info;
use rand::Rng;

use crate::tracker::OrientationSample;

/// Port opentrack-compatible trackers send to by default.
pub const OPENTRACK_DEFAULT_PORT: u16 = 4242;

/// One opentrack datagram: six little-endian f64s
/// (x, y, z, yaw, pitch, roll), positions in cm, angles in degrees.
const OPENTRACK_FRAME_LEN: usize = 48;
const OPENTRACK_YAW_INDEX: usize = 3;

/// Nominal sensor rate the paced sources emit at.
const SAMPLE_INTERVAL: Duration = Duration::from_micros(16_667);

/// Errors from pose sources.
#[derive(Debug, thiserror::Error)]
pub enum SourceFault {
    #[error("pose socket: {0}")]
    Io(#[from] std::io::Error),

    #[error("datagram too short: {len} bytes")]
    ShortDatagram { len: usize },

    #[error("replay line {line}: {detail}")]
    Replay { line: usize, detail: String },
}

/// Trait for abstracting pose delivery to enable testing.
pub trait PoseSource {
    /// Wait up to `timeout` for the next sample. `Ok(None)` means nothing
    /// arrived in time.
    fn next_sample(&mut self, timeout: Duration) -> Result<Option<OrientationSample>, SourceFault>;

    /// Short human-readable description for the HUD.
    fn describe(&self) -> String;
}

/// Real tracker feed over UDP, opentrack wire format.
pub struct UdpPoseSource {
    socket: UdpSocket,
    local_addr: String,
    buf: [u8; 64],
}

impl UdpPoseSource {
    pub fn bind(addr: &str) -> Result<Self, SourceFault> {
        let socket = UdpSocket::bind(addr)?;
        let local_addr = socket
            .local_addr()
            .map_or_else(|_| addr.to_string(), |a| a.to_string());
        info!("Listening for pose datagrams on {local_addr}");
        Ok(Self {
            socket,
            local_addr,
            buf: [0u8; 64],
        })
    }
}

impl PoseSource for UdpPoseSource {
    fn next_sample(&mut self, timeout: Duration) -> Result<Option<OrientationSample>, SourceFault> {
        // Zero read timeouts are invalid on std sockets.
        let timeout = timeout.max(Duration::from_millis(1));
        self.socket.set_read_timeout(Some(timeout))?;

        match self.socket.recv(&mut self.buf) {
            Ok(len) if len < OPENTRACK_FRAME_LEN => Err(SourceFault::ShortDatagram { len }),
            Ok(_) => {
                let yaw_degrees = read_f64_le(&self.buf, OPENTRACK_YAW_INDEX);
                Ok(Some(OrientationSample::new(yaw_degrees.to_radians())))
            }
            Err(e) if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) => Ok(None),
            Err(e) => Err(SourceFault::Io(e)),
        }
    }

    fn describe(&self) -> String {
        format!("udp {}", self.local_addr)
    }
}

fn read_f64_le(buf: &[u8], index: usize) -> f64 {
    let start = index * 8;
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&buf[start..start + 8]);
    f64::from_le_bytes(bytes)
}

/// Replays a JSONL recording of orientation samples at sensor rate.
pub struct ReplayPoseSource {
    lines: Lines<BufReader<File>>,
    path: String,
    line_no: usize,
    interval: Duration,
    last_emit: Option<Instant>,
    exhausted: bool,
}

impl ReplayPoseSource {
    pub fn open(path: &Path) -> Result<Self, SourceFault> {
        Self::with_interval(path, SAMPLE_INTERVAL)
    }

    pub fn with_interval(path: &Path, interval: Duration) -> Result<Self, SourceFault> {
        let file = File::open(path)?;
        Ok(Self {
            lines: BufReader::new(file).lines(),
            path: path.display().to_string(),
            line_no: 0,
            interval,
            last_emit: None,
            exhausted: false,
        })
    }

    fn next_line(&mut self) -> Result<Option<OrientationSample>, SourceFault> {
        loop {
            let Some(line) = self.lines.next() else {
                if !self.exhausted {
                    self.exhausted = true;
                    info!("Replay {} exhausted after {} lines", self.path, self.line_no);
                }
                return Ok(None);
            };
            self.line_no += 1;
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            return serde_json::from_str::<OrientationSample>(&line)
                .map(Some)
                .map_err(|e| SourceFault::Replay {
                    line: self.line_no,
                    detail: e.to_string(),
                });
        }
    }
}

impl PoseSource for ReplayPoseSource {
    fn next_sample(&mut self, timeout: Duration) -> Result<Option<OrientationSample>, SourceFault> {
        if self.exhausted {
            return Ok(None);
        }
        if let Some(last) = self.last_emit {
            let due = last + self.interval;
            let now = Instant::now();
            if due > now {
                let wait = due - now;
                if wait > timeout {
                    std::thread::sleep(timeout);
                    return Ok(None);
                }
                std::thread::sleep(wait);
            }
        }

        let sample = self.next_line()?;
        if sample.is_some() {
            self.last_emit = Some(Instant::now());
        }
        Ok(sample)
    }

    fn describe(&self) -> String {
        format!("replay {}", self.path)
    }
}

/// Synthetic side-to-side head sweep with a little jitter, for demos.
pub struct SweepPoseSource {
    started: Instant,
    last_emit: Option<Instant>,
    amplitude_degrees: f64,
    period: Duration,
}

impl SweepPoseSource {
    #[must_use]
    pub fn new(amplitude_degrees: f64, period: Duration) -> Self {
        Self {
            started: Instant::now(),
            last_emit: None,
            amplitude_degrees,
            period,
        }
    }
}

impl Default for SweepPoseSource {
    fn default() -> Self {
        Self::new(25.0, Duration::from_secs(8))
    }
}

impl PoseSource for SweepPoseSource {
    fn next_sample(&mut self, timeout: Duration) -> Result<Option<OrientationSample>, SourceFault> {
        if let Some(last) = self.last_emit {
            let due = last + SAMPLE_INTERVAL;
            let now = Instant::now();
            if due > now {
                let wait = due - now;
                if wait > timeout {
                    std::thread::sleep(timeout);
                    return Ok(None);
                }
                std::thread::sleep(wait);
            }
        }
        self.last_emit = Some(Instant::now());

        let t = self.started.elapsed().as_secs_f64();
        let phase = t / self.period.as_secs_f64() * std::f64::consts::TAU;
        let jitter = rand::thread_rng().gen_range(-0.2..0.2);
        let yaw_degrees = self.amplitude_degrees * phase.sin() + jitter;
        Ok(Some(OrientationSample::new(yaw_degrees.to_radians())))
    }

    fn describe(&self) -> String {
        format!("sweep ±{:.0}°", self.amplitude_degrees)
    }
}

/// Scripted source for testing: hands out a fixed sequence immediately.
pub struct ScriptedPoseSource {
    samples: Vec<OrientationSample>,
    cursor: usize,
}

impl ScriptedPoseSource {
    #[must_use]
    pub fn new(samples: Vec<OrientationSample>) -> Self {
        Self { samples, cursor: 0 }
    }
}

impl PoseSource for ScriptedPoseSource {
    fn next_sample(
        &mut self,
        _timeout: Duration,
    ) -> Result<Option<OrientationSample>, SourceFault> {
        let Some(sample) = self.samples.get(self.cursor).copied() else {
            return Ok(None);
        };
        self.cursor += 1;
        Ok(Some(sample))
    }

    fn describe(&self) -> String {
        format!("scripted ({} samples)", self.samples.len())
    }
}

/// Encode a pose as an opentrack datagram, yaw only. Used by tests and by
/// anything that wants to feed the UDP source programmatically.
#[must_use]
pub fn encode_opentrack_frame(yaw_degrees: f64) -> [u8; OPENTRACK_FRAME_LEN] {
    let mut frame = [0u8; OPENTRACK_FRAME_LEN];
    let start = OPENTRACK_YAW_INDEX * 8;
    frame[start..start + 8].copy_from_slice(&yaw_degrees.to_le_bytes());
    frame
}
