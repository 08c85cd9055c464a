//! Spectrograms of harness audio
//!
//! Uses FFT (Fast Fourier Transform) to show how the frequency content of a
//! test tone moves over time. The harness modulates a carrier with the LFO
//! under test, so the interesting part of the picture is the low band where
//! the carrier sweeps around.
//!
//! # Parameters
//!
//! ```text
//! Window      | 1024 samples, Hann
//! Hop         | 512 samples (50% overlap)
//! Magnitude   | 20*log10(|X| / sum(w)), floored at -96 dB
//! Display     | 0 - 1000 Hz
//! ```
//!
//! Input must be mono 16-bit PCM; samples are normalized by 1/32768 into
//! [-1, 1] before analysis. Audio shorter than one window is zero-padded and
//! analysed as a single window.

use super::{Canvas, RenderedFigure, SpectrogramFigure};
use crate::error::{ReportError, Result};
use rustfft::{num_complex::Complex, FftPlanner};
use std::borrow::Cow;
use std::path::Path;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::DecoderOptions;
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use tracing::{debug, info};

pub const WINDOW_SIZE: usize = 1024;
pub const HOP_SIZE: usize = WINDOW_SIZE / 2;

/// Upper edge of the displayed band
pub const MAX_DISPLAY_HZ: f64 = 1000.0;

/// Floor for silent bins
pub const DB_FLOOR: f64 = -96.0;

/// Full-scale divisor for signed 16-bit samples
const PCM16_SCALE: f64 = 32768.0;

/// Suffix appended to the table's base name for the spectrogram image
pub const SPECTROGRAM_SUFFIX: &str = "_spec";

/// Short-time magnitude spectrum, clipped to the display band.
#[derive(Debug, Clone, Default)]
pub struct Spectrogram {
    /// Window center times in seconds
    pub times: Vec<f64>,
    /// Bin frequencies in Hz (0 to the display limit)
    pub frequencies: Vec<f64>,
    /// dB magnitudes, `[time_idx * num_freq_bins + freq_idx]`
    pub magnitudes: Vec<f64>,
    pub num_freq_bins: usize,
    pub num_time_slices: usize,
    pub sample_rate: u32,
    /// Length of the analysed signal in seconds
    pub duration_secs: f64,
}

/// Hanning window function
fn hanning_window(size: usize) -> Vec<f64> {
    (0..size)
        .map(|i| {
            0.5 * (1.0 - (2.0 * std::f64::consts::PI * i as f64 / (size - 1) as f64).cos())
        })
        .collect()
}

/// Convert linear magnitude to dB
fn to_db(value: f64) -> f64 {
    if value <= 0.0 {
        DB_FLOOR
    } else {
        (20.0 * value.log10()).max(DB_FLOOR)
    }
}

/// Decode a mono 16-bit PCM file into normalized samples and its sample rate.
pub fn decode_pcm16(path: &Path) -> Result<(Vec<f64>, u32)> {
    let file = std::fs::File::open(path)?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe().format(
        &hint,
        mss,
        &FormatOptions::default(),
        &MetadataOptions::default(),
    )?;

    let mut format = probed.format;
    let track = format
        .default_track()
        .ok_or_else(|| ReportError::UnsupportedAudio("no audio track".to_string()))?;
    let track_id = track.id;
    let params = track.codec_params.clone();

    let channels = params.channels.map(|c| c.count()).unwrap_or(0);
    if channels != 1 {
        return Err(ReportError::UnsupportedAudio(format!(
            "expected mono, found {} channels",
            channels
        )));
    }
    match params.bits_per_sample {
        Some(16) => {}
        other => {
            return Err(ReportError::UnsupportedAudio(format!(
                "expected 16-bit PCM, found {:?} bits per sample",
                other
            )))
        }
    }
    let sample_rate = params
        .sample_rate
        .ok_or_else(|| ReportError::UnsupportedAudio("missing sample rate".to_string()))?;

    let mut decoder = symphonia::default::get_codecs().make(&params, &DecoderOptions::default())?;

    let mut samples = Vec::new();
    let mut sample_buf: Option<SampleBuffer<i16>> = None;

    loop {
        let packet = match format.next_packet() {
            Ok(p) => p,
            Err(SymphoniaError::IoError(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                break
            }
            Err(SymphoniaError::ResetRequired) => break,
            Err(e) => return Err(e.into()),
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(d) => d,
            Err(SymphoniaError::DecodeError(msg)) => {
                debug!(path = %path.display(), msg, "skipping undecodable packet");
                continue;
            }
            Err(e) => return Err(e.into()),
        };

        if sample_buf.is_none() {
            let spec = *decoded.spec();
            let duration = decoded.capacity() as u64;
            sample_buf = Some(SampleBuffer::new(duration, spec));
        }

        if let Some(ref mut buf) = sample_buf {
            buf.copy_interleaved_ref(decoded);
            samples.extend(buf.samples().iter().map(|&s| s as f64 / PCM16_SCALE));
        }
    }

    Ok((samples, sample_rate))
}

/// Short-time Fourier analysis of normalized samples.
pub fn compute(samples: &[f64], sample_rate: u32) -> Result<Spectrogram> {
    if sample_rate == 0 {
        return Err(ReportError::UnsupportedAudio("sample rate is zero".to_string()));
    }
    if samples.is_empty() {
        return Err(ReportError::Empty("no audio samples".to_string()));
    }

    // Input shorter than one window is zero-padded to a single window.
    let frames: Cow<[f64]> = if samples.len() < WINDOW_SIZE {
        let mut buf = samples.to_vec();
        buf.resize(WINDOW_SIZE, 0.0);
        Cow::Owned(buf)
    } else {
        Cow::Borrowed(samples)
    };

    let mut planner = FftPlanner::new();
    let fft = planner.plan_fft_forward(WINDOW_SIZE);
    let window = hanning_window(WINDOW_SIZE);
    let window_sum: f64 = window.iter().sum();

    let bin_resolution = sample_rate as f64 / WINDOW_SIZE as f64;
    let nyquist_bin = WINDOW_SIZE / 2;
    let max_bin = ((MAX_DISPLAY_HZ / bin_resolution).floor() as usize).min(nyquist_bin);
    let num_freq_bins = max_bin + 1;
    let frequencies: Vec<f64> = (0..num_freq_bins).map(|b| b as f64 * bin_resolution).collect();

    let num_windows = (frames.len() - WINDOW_SIZE) / HOP_SIZE + 1;
    let mut times = Vec::with_capacity(num_windows);
    let mut magnitudes = Vec::with_capacity(num_windows * num_freq_bins);

    for i in 0..num_windows {
        let start = i * HOP_SIZE;
        let end = start + WINDOW_SIZE;

        let mut buffer: Vec<Complex<f64>> = frames[start..end]
            .iter()
            .zip(window.iter())
            .map(|(&s, &w)| Complex::new(s * w, 0.0))
            .collect();

        fft.process(&mut buffer);

        let center = start as f64 + WINDOW_SIZE as f64 / 2.0;
        times.push(center / sample_rate as f64);
        magnitudes.extend(
            buffer[..num_freq_bins]
                .iter()
                .map(|c| to_db(c.norm() / window_sum)),
        );
    }

    Ok(Spectrogram {
        times,
        frequencies,
        magnitudes,
        num_freq_bins,
        num_time_slices: num_windows,
        sample_rate,
        duration_secs: samples.len() as f64 / sample_rate as f64,
    })
}

/// Turn an analysis into a drawable figure titled after `file_name`.
pub fn figure(spectrogram: &Spectrogram, file_name: &str) -> SpectrogramFigure {
    let db_range = super::finite_bounds(&spectrogram.magnitudes)
        .map(|(lo, hi)| if hi > lo { (lo, hi) } else { (lo, lo + 1.0) })
        .unwrap_or((DB_FLOOR, 0.0));

    SpectrogramFigure {
        caption: format!("Spectrogram: {}", file_name),
        times: spectrogram.times.clone(),
        frequencies: spectrogram.frequencies.clone(),
        magnitudes_db: spectrogram.magnitudes.clone(),
        time_range: (0.0, spectrogram.duration_secs),
        freq_range: (0.0, MAX_DISPLAY_HZ),
        db_range,
    }
}

/// Decode `wav_path`, analyse it and draw `<plots_dir>/<base>_spec.png`.
pub fn render(
    canvas: &mut dyn Canvas,
    wav_path: &Path,
    base_name: &str,
    plots_dir: &Path,
) -> Result<RenderedFigure> {
    let (samples, sample_rate) = decode_pcm16(wav_path)?;
    let spectrogram = compute(&samples, sample_rate)?;

    let file_name = wav_path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(base_name);
    let figure = figure(&spectrogram, file_name);

    let rendered = RenderedFigure::new(plots_dir, format!("{}{}", base_name, SPECTROGRAM_SUFFIX));
    canvas.draw_spectrogram(&figure, &rendered.path)?;
    info!(path = %rendered.path.display(), "generated spectrogram");
    Ok(rendered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sine(freq: f64, sample_rate: u32, seconds: f64, amplitude: f64) -> Vec<f64> {
        let n = (sample_rate as f64 * seconds) as usize;
        (0..n)
            .map(|i| amplitude * (2.0 * std::f64::consts::PI * freq * i as f64 / sample_rate as f64).sin())
            .collect()
    }

    fn write_wav(path: &Path, channels: u16, bits: u16, samples: &[i16]) {
        let spec = hound::WavSpec {
            channels,
            sample_rate: 44100,
            bits_per_sample: bits,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(path, spec).unwrap();
        for &s in samples {
            if bits == 16 {
                writer.write_sample(s).unwrap();
            } else {
                writer.write_sample(s as i32 * 256).unwrap();
            }
        }
        writer.finalize().unwrap();
    }

    // ==========================================================================
    // HANNING WINDOW TESTS
    // ==========================================================================
    //
    // w(n) = 0.5 * (1 - cos(2πn/(N-1)))
    //
    // Zero at both edges, 1.0 at the center, symmetric.
    // ==========================================================================

    #[test]
    fn test_hanning_window_edges() {
        let window = hanning_window(WINDOW_SIZE);
        assert!(window[0].abs() < 1e-12);
        assert!(window[WINDOW_SIZE - 1].abs() < 1e-12);
    }

    #[test]
    fn test_hanning_window_center() {
        let window = hanning_window(101);
        assert!((window[50] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_hanning_window_symmetry() {
        let window = hanning_window(64);
        for i in 0..32 {
            assert!((window[i] - window[63 - i]).abs() < 1e-12);
        }
    }

    // ==========================================================================
    // DECIBEL CONVERSION TESTS
    // ==========================================================================

    #[test]
    fn test_to_db_reference_points() {
        assert!((to_db(1.0) - 0.0).abs() < 1e-9);
        assert!((to_db(0.1) - (-20.0)).abs() < 1e-9);
        assert_eq!(to_db(0.0), DB_FLOOR);
        assert_eq!(to_db(-1.0), DB_FLOOR);
        assert_eq!(to_db(1e-12), DB_FLOOR);
    }

    // ==========================================================================
    // STFT TESTS
    // ==========================================================================
    //
    // At 44.1 kHz a 1024-sample window gives ~43 Hz bins, so the displayed
    // band 0-1000 Hz covers bins 0..=23.
    // ==========================================================================

    #[test]
    fn test_compute_dimensions() {
        let samples = sine(440.0, 44100, 1.0, 0.5);
        let sg = compute(&samples, 44100).unwrap();

        let expected_windows = (samples.len() - WINDOW_SIZE) / HOP_SIZE + 1;
        assert_eq!(sg.num_time_slices, expected_windows);
        assert_eq!(sg.times.len(), expected_windows);
        assert_eq!(sg.num_freq_bins, 24);
        assert_eq!(sg.magnitudes.len(), expected_windows * sg.num_freq_bins);
        assert!(*sg.frequencies.last().unwrap() <= MAX_DISPLAY_HZ);
    }

    #[test]
    fn test_compute_hop_spacing() {
        let samples = sine(220.0, 8000, 1.0, 0.5);
        let sg = compute(&samples, 8000).unwrap();
        let dt = sg.times[1] - sg.times[0];
        assert!((dt - HOP_SIZE as f64 / 8000.0).abs() < 1e-12);
        assert!((sg.times[0] - (WINDOW_SIZE as f64 / 2.0) / 8000.0).abs() < 1e-12);
    }

    #[test]
    fn test_compute_peak_at_tone_frequency() {
        let samples = sine(440.0, 44100, 0.5, 0.5);
        let sg = compute(&samples, 44100).unwrap();

        let column = &sg.magnitudes[..sg.num_freq_bins];
        let (peak_bin, _) = column
            .iter()
            .enumerate()
            .fold((0, f64::NEG_INFINITY), |best, (i, &db)| if db > best.1 { (i, db) } else { best });
        let peak_hz = sg.frequencies[peak_bin];
        assert!((peak_hz - 440.0).abs() < 44100.0 / WINDOW_SIZE as f64);
    }

    #[test]
    fn test_compute_silence_is_floor() {
        let sg = compute(&vec![0.0; WINDOW_SIZE * 2], 44100).unwrap();
        assert!(sg.magnitudes.iter().all(|&db| db == DB_FLOOR));
    }

    #[test]
    fn test_compute_short_input_is_one_padded_window() {
        let samples: Vec<f64> = sine(440.0, 44100, 1.0, 0.5).into_iter().take(800).collect();
        let sg = compute(&samples, 44100).unwrap();

        assert_eq!(sg.num_time_slices, 1);
        assert_eq!(sg.magnitudes.len(), sg.num_freq_bins);
        assert!((sg.duration_secs - 800.0 / 44100.0).abs() < 1e-12);

        let (peak_bin, _) = sg
            .magnitudes
            .iter()
            .enumerate()
            .fold((0, f64::NEG_INFINITY), |best, (i, &db)| if db > best.1 { (i, db) } else { best });
        let bin_hz = 44100.0 / WINDOW_SIZE as f64;
        assert_eq!(peak_bin, (440.0 / bin_hz).round() as usize);
    }

    #[test]
    fn test_compute_no_samples_is_empty() {
        let err = compute(&[], 44100).unwrap_err();
        assert!(matches!(err, ReportError::Empty(_)));
    }

    #[test]
    fn test_figure_ranges() {
        let samples = sine(300.0, 44100, 0.5, 0.5);
        let sg = compute(&samples, 44100).unwrap();
        let fig = figure(&sg, "tone.wav");

        assert_eq!(fig.caption, "Spectrogram: tone.wav");
        assert_eq!(fig.freq_range, (0.0, MAX_DISPLAY_HZ));
        assert!((fig.time_range.1 - 0.5).abs() < 1e-3);
        assert!(fig.db_range.0 < fig.db_range.1);
    }

    // ==========================================================================
    // DECODING TESTS
    // ==========================================================================

    #[test]
    fn test_decode_normalizes_pcm16() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tone.wav");
        write_wav(&path, 1, 16, &[0, 16384, -32768, 32767]);

        let (samples, rate) = decode_pcm16(&path).unwrap();
        assert_eq!(rate, 44100);
        assert_eq!(samples.len(), 4);
        assert_eq!(samples[0], 0.0);
        assert_eq!(samples[1], 0.5);
        assert_eq!(samples[2], -1.0);
        assert!(samples.iter().all(|s| (-1.0..=1.0).contains(s)));
    }

    #[test]
    fn test_decode_rejects_stereo() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("stereo.wav");
        write_wav(&path, 2, 16, &[0, 0, 100, 100]);

        let err = decode_pcm16(&path).unwrap_err();
        assert!(matches!(err, ReportError::UnsupportedAudio(_)));
    }

    #[test]
    fn test_decode_rejects_24_bit() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("deep.wav");
        write_wav(&path, 1, 24, &[0, 100, -100]);

        let err = decode_pcm16(&path).unwrap_err();
        assert!(matches!(err, ReportError::UnsupportedAudio(_)));
    }

    #[test]
    fn test_decode_corrupt_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.wav");
        std::fs::write(&path, b"definitely not a riff container").unwrap();

        assert!(decode_pcm16(&path).is_err());
    }

    #[test]
    fn test_decode_missing_file() {
        let err = decode_pcm16(Path::new("/nonexistent/audio.wav")).unwrap_err();
        assert!(matches!(err, ReportError::Io(_)));
    }
}
