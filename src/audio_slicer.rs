/*!
 * Approximate byte-offset audio slicing.
 *
 * The slicer reads container metadata only (duration, average bitrate, byte
 * size) and never decodes audio. Time windows are mapped to byte ranges with
 * `byte_offset(t) = header_len + t * bitrate / 8`, which is exact for
 * constant-rate PCM but only approximate for framed or variable-bitrate
 * formats: slice boundaries may fall mid-frame and corrupt a fraction of a
 * second at the edges. That trade keeps the pipeline free of a full
 * audio-decoding dependency; the remote transcriber tolerates the damaged
 * edge frames.
 */

use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

use crate::errors::SliceError;

/// Canonical PCM WAV header size; the leading bytes copied into every slice
const WAV_HEADER_LEN: u64 = 44;

/// How far past the ID3 tag to scan for the first MPEG frame sync
const MP3_SYNC_SCAN_BYTES: usize = 8192;

/// Container formats the slicer understands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioFormat {
    Wav,
    Mp3,
}

impl AudioFormat {
    /// Detect the format from a file extension
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, SliceError> {
        let ext = path
            .as_ref()
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "wav" => Ok(Self::Wav),
            "mp3" => Ok(Self::Mp3),
            other => Err(SliceError::UnsupportedFormat(other.to_string())),
        }
    }
}

/// Container metadata for one audio file, read without decoding
#[derive(Debug, Clone, Copy)]
pub struct AudioInfo {
    /// Total duration in seconds
    pub duration_secs: f64,
    /// Average bitrate in bits per second
    pub bitrate_bps: u32,
    /// Total file size in bytes
    pub byte_size: u64,
    /// Length of the leading format-identifying bytes (WAV header / ID3 tag)
    pub header_len: u64,
    /// Detected container format
    pub format: AudioFormat,
}

/// One fixed-duration time window scheduled for separate transcription
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub index: usize,
    pub start_secs: f64,
    pub end_secs: f64,
    /// Absolute byte offset where the slice payload begins
    pub byte_start: u64,
    /// Absolute byte offset where the slice payload ends (exclusive)
    pub byte_end: u64,
}

/// Read container metadata for a WAV or MP3 file
pub fn probe<P: AsRef<Path>>(path: P) -> Result<AudioInfo, SliceError> {
    let path = path.as_ref();
    match AudioFormat::from_path(path)? {
        AudioFormat::Wav => probe_wav(path),
        AudioFormat::Mp3 => probe_mp3(path),
    }
}

fn probe_wav(path: &Path) -> Result<AudioInfo, SliceError> {
    let byte_size = std::fs::metadata(path)?.len();
    let reader = hound::WavReader::open(path)?;
    let spec = reader.spec();

    let frames = reader.duration();
    let duration_secs = f64::from(frames) / f64::from(spec.sample_rate);
    let bitrate_bps =
        spec.sample_rate * u32::from(spec.bits_per_sample) * u32::from(spec.channels);

    Ok(AudioInfo {
        duration_secs,
        bitrate_bps,
        byte_size,
        header_len: WAV_HEADER_LEN,
        format: AudioFormat::Wav,
    })
}

fn probe_mp3(path: &Path) -> Result<AudioInfo, SliceError> {
    let mut file = File::open(path)?;
    let byte_size = file.metadata()?.len();

    let mut head = [0u8; 10];
    file.read_exact(&mut head)?;
    let header_len = if &head[..3] == b"ID3" {
        10 + u64::from(synchsafe_size(&head[6..10]))
    } else {
        0
    };

    file.seek(SeekFrom::Start(header_len))?;
    let mut buf = vec![0u8; MP3_SYNC_SCAN_BYTES];
    let read = file.read(&mut buf)?;
    let bitrate_bps = find_frame_bitrate(&buf[..read])
        .ok_or_else(|| SliceError::InvalidHeader(path.display().to_string()))?;

    // Average-bitrate duration estimate. For VBR files the first frame's
    // rate stands in for the average, so the estimate drifts on VBR input.
    let audio_bytes = byte_size.saturating_sub(header_len);
    let duration_secs = (audio_bytes as f64) * 8.0 / f64::from(bitrate_bps);

    Ok(AudioInfo {
        duration_secs,
        bitrate_bps,
        byte_size,
        header_len,
        format: AudioFormat::Mp3,
    })
}

/// Decode the 28-bit synchsafe size field of an ID3v2 tag
fn synchsafe_size(bytes: &[u8]) -> u32 {
    bytes
        .iter()
        .fold(0u32, |acc, &b| (acc << 7) | u32::from(b & 0x7F))
}

/// Scan for the first valid MPEG frame sync and return its bitrate
fn find_frame_bitrate(buf: &[u8]) -> Option<u32> {
    // Layer III bitrate tables, kbps, indexed by the 4-bit bitrate field
    const MPEG1_L3: [u32; 16] = [
        0, 32, 40, 48, 56, 64, 80, 96, 112, 128, 160, 192, 224, 256, 320, 0,
    ];
    const MPEG2_L3: [u32; 16] = [
        0, 8, 16, 24, 32, 40, 48, 56, 64, 80, 96, 112, 128, 144, 160, 0,
    ];

    for window in buf.windows(3) {
        if window[0] != 0xFF || window[1] & 0xE0 != 0xE0 {
            continue;
        }
        let version_bits = (window[1] >> 3) & 0x03; // 01 is reserved
        let layer_bits = (window[1] >> 1) & 0x03; // 01 = Layer III
        if version_bits == 0x01 || layer_bits != 0x01 {
            continue;
        }
        let bitrate_index = (window[2] >> 4) as usize;
        let table = if version_bits == 0x03 {
            &MPEG1_L3
        } else {
            &MPEG2_L3
        };
        let kbps = table[bitrate_index];
        if kbps > 0 {
            return Some(kbps * 1000);
        }
    }
    None
}

/// Map a time offset to an absolute byte offset, clamped to the file
pub fn byte_offset(info: &AudioInfo, secs: f64) -> u64 {
    let audio_offset = (secs * f64::from(info.bitrate_bps) / 8.0) as u64;
    (info.header_len + audio_offset).min(info.byte_size)
}

/// Compute the ordered, contiguous segment windows for one file
///
/// Segment count is `ceil(duration / chunk_seconds)`; the last window is
/// truncated so its end equals the total duration exactly.
pub fn segments(info: &AudioInfo, chunk_seconds: u32) -> Vec<Segment> {
    let chunk = f64::from(chunk_seconds.max(1));
    let duration = info.duration_secs;
    if duration <= 0.0 {
        return Vec::new();
    }

    let count = (duration / chunk).ceil() as usize;
    let mut out = Vec::with_capacity(count);
    for index in 0..count {
        let start_secs = index as f64 * chunk;
        let end_secs = (start_secs + chunk).min(duration);
        out.push(Segment {
            index,
            start_secs,
            end_secs,
            byte_start: byte_offset(info, start_secs),
            byte_end: byte_offset(info, end_secs),
        });
    }
    out
}

/// Copy the leading header bytes plus the segment's byte range
///
/// Failure to read or seek aborts this segment only; the caller moves on to
/// the next one.
pub fn slice<P: AsRef<Path>>(
    path: P,
    info: &AudioInfo,
    segment: &Segment,
) -> Result<Vec<u8>, SliceError> {
    let mut file = File::open(path.as_ref())?;

    let header_len = info.header_len.min(info.byte_size) as usize;
    let range_len = segment.byte_end.saturating_sub(segment.byte_start) as usize;
    let mut blob = Vec::with_capacity(header_len + range_len);

    let mut header = vec![0u8; header_len];
    file.read_exact(&mut header)?;
    blob.extend_from_slice(&header);

    file.seek(SeekFrom::Start(segment.byte_start))?;
    let mut payload = vec![0u8; range_len];
    file.read_exact(&mut payload)?;
    blob.extend_from_slice(&payload);

    Ok(blob)
}
