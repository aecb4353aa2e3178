/// File analysis: container probing, decoding with Symphonia and EBU R128 measurement
use crate::analyzer::{LoudnessAnalyzer, ProgramState};
use crate::error::{LoudnessError, Result};
use ebur128::Channel;
use lofty::error::LoftyError;
use lofty::file::FileType;
use lofty::probe::Probe;
use loudtag_core::{Codec, Container, Measurement};
use std::path::Path;
use symphonia::core::audio::{Channels, SampleBuffer, SignalSpec};
use symphonia::core::codecs::{self, CodecRegistry, CodecType, DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use tracing::{debug, warn};

/// Result of analyzing one file
#[derive(Debug)]
pub struct Analysis {
    /// Measured values and media identity
    pub measurement: Measurement,
    /// Retained gating state for exact album loudness, if the analyzer keeps it
    pub program: Option<ProgramState>,
}

impl Analysis {
    /// Analysis without retained program state
    pub fn from_measurement(measurement: Measurement) -> Self {
        Self {
            measurement,
            program: None,
        }
    }
}

/// Produces a loudness analysis for a file
pub trait Analyzer {
    /// Decode and measure `path`
    fn analyze(&self, path: &Path) -> Result<Analysis>;
}

/// Symphonia codec identifiers and the codec they denote
const CODECS: &[(CodecType, Codec)] = &[
    (codecs::CODEC_TYPE_MP1, Codec::Mp3),
    (codecs::CODEC_TYPE_MP2, Codec::Mp3),
    (codecs::CODEC_TYPE_MP3, Codec::Mp3),
    (codecs::CODEC_TYPE_FLAC, Codec::Flac),
    (codecs::CODEC_TYPE_VORBIS, Codec::Vorbis),
    (codecs::CODEC_TYPE_OPUS, Codec::Opus),
    (codecs::CODEC_TYPE_AAC, Codec::Aac),
    (codecs::CODEC_TYPE_ALAC, Codec::Alac),
    (codecs::CODEC_TYPE_WAVPACK, Codec::WavPack),
    (codecs::CODEC_TYPE_MONKEYS_AUDIO, Codec::Ape),
    (codecs::CODEC_TYPE_PCM_U8, Codec::Pcm),
    (codecs::CODEC_TYPE_PCM_S8, Codec::Pcm),
    (codecs::CODEC_TYPE_PCM_S16LE, Codec::Pcm),
    (codecs::CODEC_TYPE_PCM_S16BE, Codec::Pcm),
    (codecs::CODEC_TYPE_PCM_S24LE, Codec::Pcm),
    (codecs::CODEC_TYPE_PCM_S24BE, Codec::Pcm),
    (codecs::CODEC_TYPE_PCM_S32LE, Codec::Pcm),
    (codecs::CODEC_TYPE_PCM_S32BE, Codec::Pcm),
    (codecs::CODEC_TYPE_PCM_F32LE, Codec::Pcm),
    (codecs::CODEC_TYPE_PCM_F32BE, Codec::Pcm),
    (codecs::CODEC_TYPE_PCM_F64LE, Codec::Pcm),
    (codecs::CODEC_TYPE_PCM_F64BE, Codec::Pcm),
];

/// Loudness weighting of each speaker position, in WAVE channel order
const LAYOUT: &[(Channels, Channel)] = &[
    (Channels::FRONT_LEFT, Channel::Left),
    (Channels::FRONT_RIGHT, Channel::Right),
    (Channels::FRONT_CENTRE, Channel::Center),
    (Channels::LFE1, Channel::Unused),
    (Channels::REAR_LEFT, Channel::LeftSurround),
    (Channels::REAR_RIGHT, Channel::RightSurround),
    (Channels::FRONT_LEFT_CENTRE, Channel::Unused),
    (Channels::FRONT_RIGHT_CENTRE, Channel::Unused),
    (Channels::REAR_CENTRE, Channel::Unused),
    (Channels::SIDE_LEFT, Channel::LeftSurround),
    (Channels::SIDE_RIGHT, Channel::RightSurround),
];

/// Analyzer decoding with Symphonia
///
/// Supports everything Symphonia decodes (MP3, FLAC, Vorbis, AAC, ALAC, WAV,
/// AIFF). Opus needs the `opus` feature.
#[derive(Debug, Default, Clone, Copy)]
pub struct SymphoniaAnalyzer;

impl SymphoniaAnalyzer {
    /// Create a new analyzer
    pub fn new() -> Self {
        Self
    }

    /// Container family and, when the container reveals it, the codec
    fn identify(path: &Path) -> (Container, Option<Codec>) {
        let probed = Probe::open(path)
            .and_then(|probe| probe.guess_file_type().map_err(LoftyError::from))
            .map(|probe| probe.file_type());

        let from_lofty = match probed {
            Ok(Some(file_type)) => match file_type {
                FileType::Mpeg => Some((Container::Mp3, Some(Codec::Mp3))),
                FileType::Flac => Some((Container::Flac, Some(Codec::Flac))),
                FileType::Vorbis => Some((Container::Ogg, Some(Codec::Vorbis))),
                FileType::Opus => Some((Container::Ogg, Some(Codec::Opus))),
                FileType::Speex => Some((Container::Ogg, Some(Codec::Speex))),
                FileType::Mp4 => Some((Container::Mp4, None)),
                FileType::Wav => Some((Container::Wav, None)),
                FileType::Aiff => Some((Container::Aiff, None)),
                FileType::WavPack => Some((Container::WavPack, Some(Codec::WavPack))),
                FileType::Ape => Some((Container::Ape, Some(Codec::Ape))),
                FileType::Mpc => Some((Container::Mpc, Some(Codec::Musepack))),
                FileType::Aac => Some((Container::Adts, Some(Codec::Aac))),
                _ => None,
            },
            Ok(None) => None,
            Err(e) => {
                debug!("Container probe failed for {}: {}", path.display(), e);
                None
            }
        };

        from_lofty.unwrap_or_else(|| {
            let container = path
                .extension()
                .and_then(|e| e.to_str())
                .map_or(Container::Unknown, Container::from_extension);
            let codec = match container {
                Container::Asf => Some(Codec::Wma),
                _ => None,
            };
            (container, codec)
        })
    }

    fn codec_of(codec: CodecType) -> Codec {
        CODECS
            .iter()
            .find(|(ty, _)| *ty == codec)
            .map_or(Codec::Unknown, |(_, c)| *c)
    }

    /// Channel map for layouts ebur128 would weight wrongly by default
    fn channel_map(spec: &SignalSpec) -> Option<Vec<Channel>> {
        let count = spec.channels.count();
        if count <= 2 {
            return None;
        }

        let mut map: Vec<Channel> = LAYOUT
            .iter()
            .filter(|(position, _)| spec.channels.contains(*position))
            .map(|(_, channel)| *channel)
            .collect();
        map.resize(count, Channel::Unused);
        Some(map)
    }

    fn open_analyzer(spec: &SignalSpec) -> Result<LoudnessAnalyzer> {
        let mut analyzer = LoudnessAnalyzer::new(spec.rate, spec.channels.count() as u32)?;
        if let Some(map) = Self::channel_map(spec) {
            debug!("Channel map: {:?}", map);
            analyzer.set_channel_map(&map)?;
        }
        Ok(analyzer)
    }
}

#[cfg(feature = "opus")]
fn codec_registry() -> &'static CodecRegistry {
    use std::sync::OnceLock;

    static REGISTRY: OnceLock<CodecRegistry> = OnceLock::new();
    REGISTRY.get_or_init(|| {
        let mut registry = CodecRegistry::new();
        registry.register_all::<symphonia_adapter_libopus::OpusDecoder>();
        symphonia::default::register_enabled_codecs(&mut registry);
        registry
    })
}

#[cfg(not(feature = "opus"))]
fn codec_registry() -> &'static CodecRegistry {
    symphonia::default::get_codecs()
}

impl Analyzer for SymphoniaAnalyzer {
    fn analyze(&self, path: &Path) -> Result<Analysis> {
        if !path.exists() {
            return Err(LoudnessError::FileNotFound(path.display().to_string()));
        }

        let (container, container_codec) = Self::identify(path);

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
            .tracks()
            .iter()
            .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
            .ok_or_else(|| LoudnessError::Decode("No audio track found".to_string()))?;
        let track_id = track.id;
        let codec_params = track.codec_params.clone();

        let codec = match Self::codec_of(codec_params.codec) {
            Codec::Unknown => container_codec.unwrap_or(Codec::Unknown),
            known => known,
        };
        debug!(
            "{}: container {}, codec {}",
            path.display(),
            container,
            codec
        );

        let mut decoder = codec_registry().make(&codec_params, &DecoderOptions::default())?;

        let mut analyzer: Option<LoudnessAnalyzer> = None;
        let mut sample_buf: Option<SampleBuffer<f32>> = None;

        loop {
            let packet = match format.next_packet() {
                Ok(packet) => packet,
                Err(SymphoniaError::IoError(ref e))
                    if e.kind() == std::io::ErrorKind::UnexpectedEof =>
                {
                    break;
                }
                Err(SymphoniaError::ResetRequired) => break,
                Err(e) => return Err(e.into()),
            };

            if packet.track_id() != track_id {
                continue;
            }

            let decoded = match decoder.decode(&packet) {
                Ok(decoded) => decoded,
                Err(SymphoniaError::DecodeError(e)) => {
                    warn!("{}: skipping undecodable packet: {}", path.display(), e);
                    continue;
                }
                Err(e) => return Err(e.into()),
            };

            let spec = *decoded.spec();
            if analyzer.is_none() {
                analyzer = Some(Self::open_analyzer(&spec)?);
            }

            let needed = decoded.capacity() * spec.channels.count();
            let mut buf = match sample_buf.take() {
                Some(buf) if buf.capacity() >= needed => buf,
                _ => SampleBuffer::<f32>::new(decoded.capacity() as u64, spec),
            };
            buf.copy_interleaved_ref(decoded);

            if let Some(analyzer) = analyzer.as_mut() {
                analyzer.add_frames(buf.samples())?;
            }
            sample_buf = Some(buf);
        }

        let analyzer = analyzer.ok_or(LoudnessError::NoSamples)?;
        let (info, state) = analyzer.finalize()?;
        debug!("{}: {}", path.display(), info);

        Ok(Analysis {
            measurement: Measurement {
                file_path: path.to_path_buf(),
                container,
                codec,
                integrated_loudness: info.integrated_lufs,
                loudness_range: info.loudness_range_lu,
                true_peak: info.true_peak,
                duration_secs: info.duration_seconds,
            },
            program: Some(state),
        })
    }
}
