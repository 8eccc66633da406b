// Copyright 2021 bmc::labs Gmbh. All rights reserved.
//
// Authors:
//   Florian Eich <florian@bmc-labs.com>
//   Jonas Reitemeyer <alumni@bmc-labs.com>

//! Scripted stand-in for the SDK. Every call is logged, every answer comes
//! from a `Script` the test sets up beforehand.

use crate::{bindings as k4a,
            sdk::{BufferResult, K4aResult, RawHandle, Sdk, StreamResult,
                  WaitResult},
            types::{ImageFormat, SeekOrigin}};
use std::{collections::{HashMap, VecDeque},
          ffi::{c_void, CStr},
          sync::{atomic::{AtomicUsize, Ordering},
                 Arc, Mutex, MutexGuard},
          thread,
          time::Duration};


/// What the fake answers. Anything not set up explicitly succeeds.
#[derive(Debug)]
pub struct Script {
  pub installed_count:       u32,
  pub device_open:           K4aResult,
  pub start_cameras:         K4aResult,
  pub device_capture:        WaitResult,
  pub capture_temperature:   f32,
  pub playback_open:         K4aResult,
  pub record_configuration:  (K4aResult, k4a::k4a_record_configuration_t),
  pub calibration:           (K4aResult, k4a::k4a_calibration_t),
  pub set_color_conversion:  K4aResult,
  /// answers to capture reads, front first; `Eof` once empty
  pub captures:              VecDeque<StreamResult>,
  /// report success on a capture read but hand back a null capture
  pub omit_capture_handle:   bool,
  /// answers to IMU reads, front first; `Eof` once empty
  pub imu_samples:           VecDeque<(StreamResult, k4a::k4a_imu_sample_t)>,
  /// how long stream reads and writes stay in flight
  pub stream_delay:          Duration,
  pub seek:                  K4aResult,
  pub recording_length_usec: u64,
  pub last_timestamp_usec:   u64,
  pub tags:                  HashMap<String, String>,
  pub record_create:         K4aResult,
  pub add_tag:               K4aResult,
  pub add_imu_track:         K4aResult,
  pub write_header:          K4aResult,
  pub write_capture:         K4aResult,
  pub write_imu_sample:      K4aResult,
  pub flush:                 K4aResult,
}

impl Default for Script {
  fn default() -> Self {
    Self { installed_count:       1,
           device_open:           K4aResult::Succeeded,
           start_cameras:         K4aResult::Succeeded,
           device_capture:        WaitResult::Succeeded,
           capture_temperature:   f32::NAN,
           playback_open:         K4aResult::Succeeded,
           record_configuration:  (K4aResult::Succeeded, Default::default()),
           calibration:           (K4aResult::Succeeded, Default::default()),
           set_color_conversion:  K4aResult::Succeeded,
           captures:              VecDeque::new(),
           omit_capture_handle:   false,
           imu_samples:           VecDeque::new(),
           stream_delay:          Duration::from_millis(0),
           seek:                  K4aResult::Succeeded,
           recording_length_usec: 0,
           last_timestamp_usec:   0,
           tags:                  HashMap::new(),
           record_create:         K4aResult::Succeeded,
           add_tag:               K4aResult::Succeeded,
           add_imu_track:         K4aResult::Succeeded,
           write_header:          K4aResult::Succeeded,
           write_capture:         K4aResult::Succeeded,
           write_imu_sample:      K4aResult::Succeeded,
           flush:                 K4aResult::Succeeded, }
  }
}


/// One logged SDK call with the arguments worth asserting on.
#[derive(Clone, Debug, PartialEq)]
pub enum Call {
  DeviceGetInstalledCount,
  DeviceOpen(u32),
  DeviceClose(RawHandle),
  DeviceStartCameras(RawHandle, k4a::k4a_device_configuration_t),
  DeviceStopCameras(RawHandle),
  DeviceGetCapture(RawHandle, i32),
  CaptureReference(RawHandle),
  CaptureRelease(RawHandle),
  CaptureGetTemperature(RawHandle),
  PlaybackOpen(String),
  PlaybackGetCalibration(RawHandle),
  PlaybackGetRecordConfiguration(RawHandle),
  /// tag name and size of the buffer passed in
  PlaybackGetTag(RawHandle, String, usize),
  PlaybackSetColorConversion(RawHandle, ImageFormat),
  PlaybackGetNextCapture(RawHandle),
  PlaybackGetPreviousCapture(RawHandle),
  PlaybackGetNextImuSample(RawHandle),
  PlaybackGetPreviousImuSample(RawHandle),
  PlaybackSeekTimestamp(RawHandle, i64, SeekOrigin),
  PlaybackGetRecordingLength(RawHandle),
  PlaybackGetLastTimestamp(RawHandle),
  PlaybackClose(RawHandle),
  RecordCreate(String, Option<RawHandle>, k4a::k4a_device_configuration_t),
  RecordAddTag(RawHandle, String, String),
  RecordAddImuTrack(RawHandle),
  RecordWriteHeader(RawHandle),
  RecordWriteCapture(RawHandle, RawHandle),
  RecordWriteImuSample(RawHandle, k4a::k4a_imu_sample_t),
  RecordFlush(RawHandle),
  RecordClose(RawHandle),
}


#[derive(Debug, Default)]
struct State {
  script:      Script,
  calls:       Vec<Call>,
  last_handle: usize,
}

impl State {
  fn new_handle(&mut self) -> RawHandle {
    self.last_handle += 1;
    RawHandle::from_raw((self.last_handle * 8) as *mut c_void)
      .expect("fake handles are never null")
  }
}


/// Cheap to clone; all clones share one script and one call log.
#[derive(Clone, Debug, Default)]
pub struct FakeSdk {
  state:     Arc<Mutex<State>>,
  /// stream calls currently running, tracked outside of `state`
  in_flight: Arc<AtomicUsize>,
  overlaps:  Arc<AtomicUsize>,
}

impl FakeSdk {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn sdk(&self) -> Arc<dyn Sdk> {
    Arc::new(self.clone())
  }

  /// A handle no other call of this fake has returned.
  pub fn new_handle(&self) -> RawHandle {
    self.lock().new_handle()
  }

  pub fn script<F: FnOnce(&mut Script)>(&self, f: F) {
    f(&mut self.lock().script)
  }

  pub fn calls(&self) -> Vec<Call> {
    self.lock().calls.clone()
  }

  pub fn count(&self, call: &Call) -> usize {
    self.count_where(|logged| logged == call)
  }

  pub fn count_where<P: Fn(&Call) -> bool>(&self, predicate: P) -> usize {
    self.lock().calls.iter().filter(|call| predicate(call)).count()
  }

  /// How often a stream call started while another one was still running.
  pub fn overlaps(&self) -> usize {
    self.overlaps.load(Ordering::SeqCst)
  }

  fn lock(&self) -> MutexGuard<'_, State> {
    self.state.lock().unwrap()
  }

  /// Logs `call` and hands back the state to answer from.
  fn log(&self, call: Call) -> MutexGuard<'_, State> {
    let mut state = self.lock();
    state.calls.push(call);
    state
  }

  /// Fresh handle on success, none otherwise.
  fn open(&self, call: Call, result: fn(&Script) -> K4aResult)
          -> (K4aResult, Option<RawHandle>) {
    let mut state = self.log(call);
    let result = result(&state.script);
    match result {
      K4aResult::Succeeded => (result, Some(state.new_handle())),
      K4aResult::Failed => (result, None),
    }
  }

  /// Runs a stream call, holding it in flight for `stream_delay` without
  /// holding the state lock, and counts calls which overlap with it.
  fn stream_call<T, F: FnOnce() -> T>(&self, f: F) -> T {
    let delay = self.lock().script.stream_delay;
    if self.in_flight.fetch_add(1, Ordering::SeqCst) > 0 {
      self.overlaps.fetch_add(1, Ordering::SeqCst);
    }
    thread::sleep(delay);
    let result = f();
    self.in_flight.fetch_sub(1, Ordering::SeqCst);
    result
  }

  fn read_capture(&self, call: Call) -> (StreamResult, Option<RawHandle>) {
    let mut state = self.log(call);
    let result = state.script.captures.pop_front().unwrap_or(StreamResult::Eof);
    match result {
      StreamResult::Succeeded if !state.script.omit_capture_handle => {
        (result, Some(state.new_handle()))
      }
      _ => (result, None),
    }
  }

  fn read_imu_sample(&self,
                     call: Call)
                     -> (StreamResult, k4a::k4a_imu_sample_t) {
    let mut state = self.log(call);
    state.script
         .imu_samples
         .pop_front()
         .unwrap_or((StreamResult::Eof, Default::default()))
  }
}

fn string(cstr: &CStr) -> String {
  cstr.to_string_lossy().into_owned()
}


impl Sdk for FakeSdk {
  fn device_get_installed_count(&self) -> u32 {
    self.log(Call::DeviceGetInstalledCount).script.installed_count
  }

  fn device_open(&self, index: u32) -> (K4aResult, Option<RawHandle>) {
    self.open(Call::DeviceOpen(index), |s| s.device_open)
  }

  fn device_close(&self, device: RawHandle) {
    self.log(Call::DeviceClose(device));
  }

  fn device_start_cameras(&self,
                          device: RawHandle,
                          config: &k4a::k4a_device_configuration_t)
                          -> K4aResult {
    self.log(Call::DeviceStartCameras(device, *config))
        .script
        .start_cameras
  }

  fn device_stop_cameras(&self, device: RawHandle) {
    self.log(Call::DeviceStopCameras(device));
  }

  fn device_get_capture(&self,
                        device: RawHandle,
                        timeout_in_ms: i32)
                        -> (WaitResult, Option<RawHandle>) {
    let mut state = self.log(Call::DeviceGetCapture(device, timeout_in_ms));
    let result = state.script.device_capture;
    match result {
      WaitResult::Succeeded => (result, Some(state.new_handle())),
      _ => (result, None),
    }
  }

  fn capture_reference(&self, capture: RawHandle) {
    self.log(Call::CaptureReference(capture));
  }

  fn capture_release(&self, capture: RawHandle) {
    self.log(Call::CaptureRelease(capture));
  }

  fn capture_get_temperature_c(&self, capture: RawHandle) -> f32 {
    self.log(Call::CaptureGetTemperature(capture))
        .script
        .capture_temperature
  }

  fn playback_open(&self, path: &CStr) -> (K4aResult, Option<RawHandle>) {
    self.open(Call::PlaybackOpen(string(path)), |s| s.playback_open)
  }

  fn playback_get_calibration(&self,
                              playback: RawHandle)
                              -> (K4aResult, k4a::k4a_calibration_t) {
    self.log(Call::PlaybackGetCalibration(playback))
        .script
        .calibration
  }

  fn playback_get_record_configuration(
    &self,
    playback: RawHandle)
    -> (K4aResult, k4a::k4a_record_configuration_t) {
    self.log(Call::PlaybackGetRecordConfiguration(playback))
        .script
        .record_configuration
  }

  fn playback_get_tag(&self,
                      playback: RawHandle,
                      name: &CStr,
                      value: &mut [u8])
                      -> (BufferResult, usize) {
    let state =
      self.log(Call::PlaybackGetTag(playback, string(name), value.len()));
    let tag = match state.script.tags.get(&string(name)) {
      Some(tag) => tag.as_bytes(),
      None => return (BufferResult::Failed, 0),
    };

    let size = tag.len() + 1;
    if value.len() < size {
      return (BufferResult::TooSmall, size);
    }
    value[..tag.len()].copy_from_slice(tag);
    value[tag.len()] = 0;
    (BufferResult::Succeeded, size)
  }

  fn playback_set_color_conversion(&self,
                                   playback: RawHandle,
                                   target_format: ImageFormat)
                                   -> K4aResult {
    self.log(Call::PlaybackSetColorConversion(playback, target_format))
        .script
        .set_color_conversion
  }

  fn playback_get_next_capture(&self,
                               playback: RawHandle)
                               -> (StreamResult, Option<RawHandle>) {
    self.stream_call(|| self.read_capture(Call::PlaybackGetNextCapture(playback)))
  }

  fn playback_get_previous_capture(&self,
                                   playback: RawHandle)
                                   -> (StreamResult, Option<RawHandle>) {
    self.read_capture(Call::PlaybackGetPreviousCapture(playback))
  }

  fn playback_get_next_imu_sample(&self,
                                  playback: RawHandle)
                                  -> (StreamResult, k4a::k4a_imu_sample_t) {
    self.stream_call(|| {
          self.read_imu_sample(Call::PlaybackGetNextImuSample(playback))
        })
  }

  fn playback_get_previous_imu_sample(
    &self,
    playback: RawHandle)
    -> (StreamResult, k4a::k4a_imu_sample_t) {
    self.read_imu_sample(Call::PlaybackGetPreviousImuSample(playback))
  }

  fn playback_seek_timestamp(&self,
                             playback: RawHandle,
                             offset_usec: i64,
                             origin: SeekOrigin)
                             -> K4aResult {
    self.log(Call::PlaybackSeekTimestamp(playback, offset_usec, origin))
        .script
        .seek
  }

  fn playback_get_recording_length_usec(&self, playback: RawHandle) -> u64 {
    self.log(Call::PlaybackGetRecordingLength(playback))
        .script
        .recording_length_usec
  }

  fn playback_get_last_timestamp_usec(&self, playback: RawHandle) -> u64 {
    self.log(Call::PlaybackGetLastTimestamp(playback))
        .script
        .last_timestamp_usec
  }

  fn playback_close(&self, playback: RawHandle) {
    self.log(Call::PlaybackClose(playback));
  }

  fn record_create(&self,
                   path: &CStr,
                   device: Option<RawHandle>,
                   device_config: k4a::k4a_device_configuration_t)
                   -> (K4aResult, Option<RawHandle>) {
    self.open(Call::RecordCreate(string(path), device, device_config),
              |s| s.record_create)
  }

  fn record_add_tag(&self,
                    recording: RawHandle,
                    name: &CStr,
                    value: &CStr)
                    -> K4aResult {
    self.log(Call::RecordAddTag(recording, string(name), string(value)))
        .script
        .add_tag
  }

  fn record_add_imu_track(&self, recording: RawHandle) -> K4aResult {
    self.log(Call::RecordAddImuTrack(recording))
        .script
        .add_imu_track
  }

  fn record_write_header(&self, recording: RawHandle) -> K4aResult {
    self.log(Call::RecordWriteHeader(recording))
        .script
        .write_header
  }

  fn record_write_capture(&self,
                          recording: RawHandle,
                          capture: RawHandle)
                          -> K4aResult {
    self.stream_call(|| {
          self.log(Call::RecordWriteCapture(recording, capture))
              .script
              .write_capture
        })
  }

  fn record_write_imu_sample(&self,
                             recording: RawHandle,
                             imu_sample: k4a::k4a_imu_sample_t)
                             -> K4aResult {
    self.log(Call::RecordWriteImuSample(recording, imu_sample))
        .script
        .write_imu_sample
  }

  fn record_flush(&self, recording: RawHandle) -> K4aResult {
    self.log(Call::RecordFlush(recording)).script.flush
  }

  fn record_close(&self, recording: RawHandle) {
    self.log(Call::RecordClose(recording));
  }
}
