//! # Serial Transport
//!
//! Talks to the panel controller through a USB RS-485 adapter exposed as a
//! TTY (e.g. `/dev/ttyUSB0`).
//!
//! ## TTY Configuration
//!
//! The device is opened in raw mode so command bytes pass through unmodified:
//!
//! - **No input processing**: Disable IGNBRK, BRKINT, PARMRK, ISTRIP, etc.
//! - **No output processing**: Disable OPOST (no CR/LF translation)
//! - **8N1**: CS8, no parity, one stop bit
//! - **No echo**: Disable ECHO, ECHONL
//! - **Non-canonical mode**: Disable ICANON (no line buffering)
//! - **Baud**: input and output speed set to the display's rate
//!
//! ## Reconnect
//!
//! [`ReconnectingSerial`] keeps the port optional. While it is closed, writes
//! fail fast and an open is attempted at most once per retry interval. A write
//! error closes the port so the next interval reopens it.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::os::unix::io::AsRawFd;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use tracing::{info, warn};

use super::DisplayLink;
use crate::error::FlipdotError;

/// Default adapter path
pub const DEFAULT_DEVICE: &str = "/dev/ttyUSB0";

/// Default baud rate of the panel controller
pub const DEFAULT_BAUD: u32 = 57600;

/// Minimum time between open attempts
pub const DEFAULT_RETRY_INTERVAL: Duration = Duration::from_secs(2);

/// # Serial Display Transport
///
/// ## Example
///
/// ```no_run
/// use flipdot::transport::SerialTransport;
///
/// let mut port = SerialTransport::open("/dev/ttyUSB0", 57600)?;
/// port.write_all(&[0x80, 0x00])?;
/// # Ok::<(), flipdot::error::FlipdotError>(())
/// ```
pub struct SerialTransport {
    file: File,
    path: PathBuf,
}

impl SerialTransport {
    /// Open the TTY and switch it to raw mode at `baud`.
    ///
    /// ## Errors
    ///
    /// Returns an error if:
    /// - The device doesn't exist
    /// - Permission denied (may need the dialout group)
    /// - The baud rate is not a standard termios speed
    /// - TTY configuration fails
    pub fn open<P: AsRef<Path>>(device: P, baud: u32) -> Result<Self, FlipdotError> {
        let path = device.as_ref();
        let speed = baud_constant(baud)
            .ok_or_else(|| FlipdotError::Transport(format!("Unsupported baud rate {}", baud)))?;

        let file = OpenOptions::new().write(true).open(path).map_err(|e| {
            FlipdotError::Transport(format!("Failed to open {}: {}", path.display(), e))
        })?;

        configure_tty_raw(file.as_raw_fd(), speed)?;

        Ok(Self {
            file,
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write and flush `data`.
    pub fn write_all(&mut self, data: &[u8]) -> Result<(), FlipdotError> {
        self.file
            .write_all(data)
            .map_err(|e| FlipdotError::Transport(format!("Write failed: {}", e)))?;
        self.file
            .flush()
            .map_err(|e| FlipdotError::Transport(format!("Flush failed: {}", e)))
    }
}

impl DisplayLink for SerialTransport {
    fn write_frame(&mut self, bytes: &[u8]) -> Result<(), FlipdotError> {
        self.write_all(bytes)
    }

    fn describe(&self) -> String {
        format!("serial {}", self.path.display())
    }
}

/// Serial link that survives the adapter being unplugged.
pub struct ReconnectingSerial {
    path: PathBuf,
    baud: u32,
    retry_interval: Duration,
    port: Option<SerialTransport>,
    last_attempt: Option<Instant>,
    attempts: u64,
}

impl ReconnectingSerial {
    /// Create the link and try to open the port once.
    pub fn new<P: AsRef<Path>>(device: P, baud: u32) -> Self {
        let mut link = Self {
            path: device.as_ref().to_path_buf(),
            baud,
            retry_interval: DEFAULT_RETRY_INTERVAL,
            port: None,
            last_attempt: None,
            attempts: 0,
        };
        link.try_open();
        link
    }

    pub fn with_retry_interval(mut self, interval: Duration) -> Self {
        self.retry_interval = interval;
        self
    }

    pub fn is_open(&self) -> bool {
        self.port.is_some()
    }

    /// Number of open attempts so far.
    pub fn attempts(&self) -> u64 {
        self.attempts
    }

    fn try_open(&mut self) {
        self.last_attempt = Some(Instant::now());
        self.attempts += 1;
        match SerialTransport::open(&self.path, self.baud) {
            Ok(port) => {
                info!(device = %self.path.display(), baud = self.baud, "Serial port open");
                self.port = Some(port);
            }
            Err(e) => {
                warn!(device = %self.path.display(), error = %e, "Serial port unavailable");
            }
        }
    }

    fn retry_due(&self) -> bool {
        self.last_attempt
            .is_none_or(|t| t.elapsed() >= self.retry_interval)
    }
}

impl DisplayLink for ReconnectingSerial {
    fn write_frame(&mut self, bytes: &[u8]) -> Result<(), FlipdotError> {
        if self.port.is_none() && self.retry_due() {
            self.try_open();
        }
        let Some(port) = self.port.as_mut() else {
            return Err(FlipdotError::Transport(format!(
                "{} is not open",
                self.path.display()
            )));
        };
        let result = port.write_all(bytes);
        if let Err(e) = &result {
            warn!(device = %self.path.display(), error = %e, "Serial write failed, closing port");
            self.port = None;
        }
        result
    }

    fn describe(&self) -> String {
        format!("serial {} @ {} baud", self.path.display(), self.baud)
    }
}

/// Map a numeric baud rate to its termios speed constant.
pub fn baud_constant(baud: u32) -> Option<libc::speed_t> {
    let speed = match baud {
        1200 => libc::B1200,
        2400 => libc::B2400,
        4800 => libc::B4800,
        9600 => libc::B9600,
        19200 => libc::B19200,
        38400 => libc::B38400,
        57600 => libc::B57600,
        115200 => libc::B115200,
        230400 => libc::B230400,
        _ => return None,
    };
    Some(speed)
}

/// Configure a file descriptor for raw 8N1 at `speed`.
///
/// IXON/IXOFF/IXANY are cleared because 0x11 and 0x13 appear in payloads.
fn configure_tty_raw(fd: i32, speed: libc::speed_t) -> Result<(), FlipdotError> {
    use std::mem::MaybeUninit;

    let mut termios = MaybeUninit::uninit();
    let result = unsafe { libc::tcgetattr(fd, termios.as_mut_ptr()) };
    if result != 0 {
        return Err(FlipdotError::Transport(format!(
            "tcgetattr failed: {}",
            io::Error::last_os_error()
        )));
    }
    let mut termios = unsafe { termios.assume_init() };

    termios.c_iflag &= !(libc::IGNBRK
        | libc::BRKINT
        | libc::PARMRK
        | libc::ISTRIP
        | libc::INLCR
        | libc::IGNCR
        | libc::ICRNL
        | libc::IXON
        | libc::IXOFF
        | libc::IXANY);

    termios.c_oflag &= !libc::OPOST;

    termios.c_lflag &= !(libc::ECHO | libc::ECHONL | libc::ICANON | libc::ISIG | libc::IEXTEN);

    // 8N1, receiver on, ignore modem lines
    termios.c_cflag &= !(libc::CSIZE | libc::PARENB | libc::CSTOPB);
    termios.c_cflag |= libc::CS8 | libc::CREAD | libc::CLOCAL;

    let speed_set = unsafe {
        libc::cfsetispeed(&mut termios, speed) == 0 && libc::cfsetospeed(&mut termios, speed) == 0
    };
    if !speed_set {
        return Err(FlipdotError::Transport(format!(
            "cfsetspeed failed: {}",
            io::Error::last_os_error()
        )));
    }

    let result = unsafe { libc::tcsetattr(fd, libc::TCSANOW, &termios) };
    if result != 0 {
        return Err(FlipdotError::Transport(format!(
            "tcsetattr failed: {}",
            io::Error::last_os_error()
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const MISSING: &str = "/dev/flipdot-test-missing";

    #[test]
    fn test_defaults() {
        assert_eq!(DEFAULT_DEVICE, "/dev/ttyUSB0");
        assert_eq!(DEFAULT_BAUD, 57600);
    }

    #[test]
    fn test_baud_constants() {
        assert_eq!(baud_constant(57600), Some(libc::B57600));
        assert_eq!(baud_constant(9600), Some(libc::B9600));
        assert_eq!(baud_constant(12345), None);
    }

    #[test]
    fn test_open_missing_device_fails() {
        assert!(SerialTransport::open(MISSING, 57600).is_err());
    }

    #[test]
    fn test_open_rejects_bad_baud() {
        let err = SerialTransport::open(MISSING, 1234).err().unwrap();
        assert!(err.to_string().contains("baud"));
    }

    #[test]
    fn test_closed_port_fails_fast_between_retries() {
        let mut link = ReconnectingSerial::new(MISSING, 57600)
            .with_retry_interval(Duration::from_secs(3600));
        assert!(!link.is_open());
        assert_eq!(link.attempts(), 1);

        assert!(link.write_frame(&[0x80]).is_err());
        assert!(link.write_frame(&[0x80]).is_err());
        assert_eq!(link.attempts(), 1);
    }

    #[test]
    fn test_retries_once_interval_passed() {
        let mut link = ReconnectingSerial::new(MISSING, 57600).with_retry_interval(Duration::ZERO);
        assert!(link.write_frame(&[0x80]).is_err());
        assert!(link.write_frame(&[0x80]).is_err());
        assert_eq!(link.attempts(), 3);
    }
}
