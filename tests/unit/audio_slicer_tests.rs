/*!
 * Tests for audio container probing and byte-range slicing
 */

use anyhow::Result;
use std::fs;

use koscribe::audio_slicer::{self, AudioFormat};
use koscribe::errors::SliceError;

use crate::common;

/// Test that probing a WAV file reads duration and bitrate from the header
#[test]
fn test_probe_withWavFile_shouldReadContainerMetadata() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let wav = common::create_test_wav(temp_dir.path(), "sample.wav", 90)?;

    let info = audio_slicer::probe(&wav)?;

    assert_eq!(info.format, AudioFormat::Wav);
    assert!((info.duration_secs - 90.0).abs() < 1e-9);
    // 1 kHz mono 16-bit PCM
    assert_eq!(info.bitrate_bps, 16_000);
    assert_eq!(info.header_len, 44);
    Ok(())
}

/// Test that probing an MP3 reads the frame-header bitrate and estimates duration
#[test]
fn test_probe_withMp3File_shouldEstimateDurationFromBitrate() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("sample.mp3");

    // MPEG1 Layer III sync with bitrate index 9 (128 kbps), padded to 32000
    // bytes of audio: 32000 * 8 / 128000 = 2 seconds
    let mut bytes = vec![0xFF, 0xFB, 0x90, 0x00];
    bytes.resize(32_000, 0u8);
    fs::write(&path, &bytes)?;

    let info = audio_slicer::probe(&path)?;

    assert_eq!(info.format, AudioFormat::Mp3);
    assert_eq!(info.bitrate_bps, 128_000);
    assert_eq!(info.header_len, 0);
    assert!((info.duration_secs - 2.0).abs() < 1e-6);
    Ok(())
}

/// Test that an ID3v2 tag is treated as the leading header
#[test]
fn test_probe_withId3Tag_shouldSkipTagBytes() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("tagged.mp3");

    // ID3v2 header announcing a 100-byte tag, then the first frame
    let mut bytes = vec![b'I', b'D', b'3', 0x03, 0x00, 0x00, 0x00, 0x00, 0x00, 0x64];
    bytes.resize(110, 0u8);
    bytes.extend_from_slice(&[0xFF, 0xFB, 0x90, 0x00]);
    bytes.resize(110 + 16_000, 0u8);
    fs::write(&path, &bytes)?;

    let info = audio_slicer::probe(&path)?;

    assert_eq!(info.header_len, 110);
    assert_eq!(info.bitrate_bps, 128_000);
    // 16000 audio bytes at 16000 bytes/sec
    assert!((info.duration_secs - 1.0).abs() < 1e-6);
    Ok(())
}

/// Test that an unknown extension is rejected up front
#[test]
fn test_probe_withUnsupportedExtension_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "notes.txt", "not audio")?;

    match audio_slicer::probe(&path) {
        Err(SliceError::UnsupportedFormat(ext)) => assert_eq!(ext, "txt"),
        other => panic!("expected UnsupportedFormat, got {:?}", other),
    }
    Ok(())
}

/// Test that slicing returns header plus the requested byte range
#[test]
fn test_slice_shouldPrependHeaderBytes() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let wav = common::create_test_wav(temp_dir.path(), "sample.wav", 10)?;

    let info = audio_slicer::probe(&wav)?;
    let segments = audio_slicer::segments(&info, 4);
    assert_eq!(segments.len(), 3);

    let first = audio_slicer::slice(&wav, &info, &segments[0])?;
    let expected_len =
        info.header_len as usize + (segments[0].byte_end - segments[0].byte_start) as usize;
    assert_eq!(first.len(), expected_len);

    // The leading bytes are the WAV magic
    assert_eq!(&first[..4], b"RIFF");
    Ok(())
}

/// Test that segment byte ranges tile the audio region of the file
#[test]
fn test_segments_withProbedWav_shouldTileAudioBytes() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let wav = common::create_test_wav(temp_dir.path(), "sample.wav", 90)?;

    let info = audio_slicer::probe(&wav)?;
    let segments = audio_slicer::segments(&info, 60);

    assert_eq!(segments.len(), 2);
    assert_eq!(segments[0].byte_start, info.header_len);
    assert_eq!(segments[0].byte_end, segments[1].byte_start);
    assert_eq!(segments[1].end_secs, info.duration_secs);
    assert!(segments[1].byte_end <= info.byte_size);
    Ok(())
}

/// Test that slicing a missing file propagates an I/O slice error
#[test]
fn test_slice_withMissingFile_shouldReturnIoError() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let wav = common::create_test_wav(temp_dir.path(), "sample.wav", 10)?;

    let info = audio_slicer::probe(&wav)?;
    let segments = audio_slicer::segments(&info, 5);
    fs::remove_file(&wav)?;

    match audio_slicer::slice(&wav, &info, &segments[0]) {
        Err(SliceError::Io(_)) => {}
        other => panic!("expected Io error, got {:?}", other),
    }
    Ok(())
}
