use crate::error::AnalyzerError;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, Sample, SampleFormat};
use log::{debug, error, info};
use ringbuf::traits::{Producer, Split};
use ringbuf::{HeapCons, HeapProd, HeapRb};

/// Lock-free mono sample ring between the audio callback and the analyzer.
pub fn sample_tap(capacity: usize) -> (HeapProd<f32>, HeapCons<f32>) {
    HeapRb::<f32>::new(capacity).split()
}

pub struct AudioStream {
    _stream: cpal::Stream,
    sample_rate: f32,
}

impl AudioStream {
    pub fn new(
        device: &cpal::Device,
        config: &cpal::StreamConfig,
        sample_format: SampleFormat,
        producer: HeapProd<f32>,
    ) -> Result<Self, anyhow::Error> {
        let stream = match sample_format {
            cpal::SampleFormat::F32 => build_stream::<f32>(device, config, producer)?,
            cpal::SampleFormat::I16 => build_stream::<i16>(device, config, producer)?,
            cpal::SampleFormat::U16 => build_stream::<u16>(device, config, producer)?,
            other => {
                return Err(AnalyzerError::UnsupportedSampleFormat(other.to_string()).into());
            }
        };

        stream.play()?;

        Ok(Self {
            _stream: stream,
            sample_rate: config.sample_rate.0 as f32,
        })
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }
}

pub fn input_device_names() -> Vec<String> {
    cpal::default_host()
        .input_devices()
        .ok()
        .map(|iter| iter.filter_map(|d| d.name().ok()).collect())
        .unwrap_or_default()
}

/// Index of the host's default input device within `devices`, or 0.
pub fn default_input_device_index(devices: &[String]) -> usize {
    let default_device_name = cpal::default_host()
        .default_input_device()
        .and_then(|d| d.name().ok());

    default_device_name
        .and_then(|default_name| devices.iter().position(|name| *name == default_name))
        .unwrap_or(0)
}

pub fn create_audio_stream(
    device_idx: usize,
    devices: &[String],
    producer: HeapProd<f32>,
) -> Result<AudioStream, anyhow::Error> {
    let host = cpal::default_host();

    let device_name = devices
        .get(device_idx)
        .ok_or_else(|| AnalyzerError::DeviceNotFound(format!("#{device_idx}")))?;

    // Get the device by matching name
    let device = host
        .input_devices()?
        .find(|d| d.name().ok().as_ref() == Some(device_name))
        .ok_or_else(|| AnalyzerError::DeviceNotFound(device_name.clone()))?;

    let supported_config = device.default_input_config()?;
    let sample_format = supported_config.sample_format();
    let stream_config: cpal::StreamConfig = supported_config.into();
    debug!(
        "Opening {device_name}: {} channel(s) at {} Hz, {sample_format}",
        stream_config.channels, stream_config.sample_rate.0
    );

    let stream = AudioStream::new(&device, &stream_config, sample_format, producer)?;
    info!("Capturing from {device_name}");
    Ok(stream)
}

fn build_stream<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    mut producer: HeapProd<f32>,
) -> Result<cpal::Stream, anyhow::Error>
where
    T: Sample + FromSample<f32> + cpal::SizedSample,
    f32: FromSample<T>,
{
    let channels = usize::from(config.channels.max(1));

    // Only the first channel is analyzed. A full ring drops the rest of the block.
    let stream = device.build_input_stream(
        config,
        move |data: &[T], _: &cpal::InputCallbackInfo| {
            producer.push_iter(data.chunks(channels).map(|frame| frame[0].to_sample::<f32>()));
        },
        |err| error!("Stream error: {err}"),
        None,
    )?;

    Ok(stream)
}
