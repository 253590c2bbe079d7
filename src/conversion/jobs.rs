//! The four job kinds
//!
//! Each job checks its input, derives a free output path, runs ffmpeg one
//! or more times and finally checks both the exit status of the last run and
//! that the output file exists. Neither is trusted on its own.

use std::path::{Path, PathBuf};

use super::background::{JobError, LogSink};
use super::ffmpeg::{
    audio_codec_for, audio_edit_args, fast_encode_args, first_pass_args, reencode_args,
    second_pass_args, stream_copy_args,
};
use super::output_manager::{
    OutputManager, cleanup_passlogs, input_stem, input_suffix, passlog_prefix,
};
use super::probe::probe_duration;
use super::runner::run_tool;
use crate::core::{
    AppConfig, AudioEditParams, BitratePlan, CompressParams, ConvertParams, JobRequest, Operation,
    compose, format_bps, plan,
};

/// Run a job to completion, returning the path of the file it wrote
pub async fn run_job(
    request: &JobRequest,
    config: &AppConfig,
    sink: &LogSink,
) -> Result<PathBuf, JobError> {
    let input = request.input_path.as_path();
    if !input.exists() {
        return Err(JobError::MissingInput(input.to_path_buf()));
    }

    let outputs = OutputManager::new(&config.output_dir);
    outputs.ensure_dir().map_err(JobError::Io)?;

    match &request.operation {
        Operation::Convert(params) => convert(input, params, config, &outputs, sink).await,
        Operation::CompressPrecise(params) => {
            compress_precise(request, params, config, &outputs, sink).await
        }
        Operation::CompressFast(params) => {
            compress_fast(input, params, config, &outputs, sink).await
        }
        Operation::AudioEdit(params) => audio_edit(input, params, config, &outputs, sink).await,
    }
}

/// Remove whatever a failed ffmpeg run left at `output`
///
/// ffmpeg creates the file before writing the header, so a failed run can
/// leave an empty or truncated file behind.
fn discard_partial(output: &Path) {
    match std::fs::remove_file(output) {
        Ok(()) => log::debug!("Removed partial output {}", output.display()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => log::warn!("Failed to remove partial output {}: {}", output.display(), e),
    }
}

/// Accept the result of the last ffmpeg run of a job
fn finish(code: Option<i32>, output: PathBuf) -> Result<PathBuf, JobError> {
    if code != Some(0) {
        discard_partial(&output);
        return Err(JobError::ToolFailed(code));
    }
    if output.exists() {
        Ok(output)
    } else {
        Err(JobError::MissingOutput(output))
    }
}

/// Container conversion: try a stream copy, fall back to a full re-encode
async fn convert(
    input: &Path,
    params: &ConvertParams,
    config: &AppConfig,
    outputs: &OutputManager,
    sink: &LogSink,
) -> Result<PathBuf, JobError> {
    let output = outputs.resolve(&format!("{}.{}", input_stem(input), params.extension));

    let code = run_tool(
        &config.ffmpeg,
        &stream_copy_args(input, &output),
        "Trying stream copy",
        sink,
    )
    .await?;

    if code == Some(0) && output.exists() {
        sink.line(format!("Done (stream copy): {}", output.display()));
        return Ok(output);
    }

    discard_partial(&output);
    sink.line("Stream copy did not work, re-encoding (libx264/aac)");
    let code = run_tool(&config.ffmpeg, &reencode_args(input, &output), "Command", sink).await?;

    let output = finish(code, output)?;
    sink.line(format!("Done (re-encode): {}", output.display()));
    Ok(output)
}

/// Probe the duration and plan bitrates, reporting the plan to the user
async fn plan_for(
    input: &Path,
    params: &CompressParams,
    config: &AppConfig,
    sink: &LogSink,
) -> Result<BitratePlan, JobError> {
    let duration = probe_duration(&config.ffprobe, input)
        .await
        .ok_or_else(|| JobError::ProbeFailed(input.to_path_buf()))?;

    let plan =
        plan(params.target_size_mb, duration, params.audio_kbps).map_err(JobError::Validation)?;

    sink.line(format!("Duration: {:.2} s", duration));
    if plan.clamped {
        sink.line(
            "Warning: the computed video bitrate is too low; lower the audio bitrate \
             or raise the target size. Using 90% of the total budget instead.",
        );
    }
    sink.line(format!(
        "Target size: {} MB -> video_bitrate={} bps ({}), audio={}k",
        params.target_size_mb,
        plan.video_bps,
        format_bps(plan.video_bps),
        params.audio_kbps
    ));
    Ok(plan)
}

/// Two-pass encode at the planned bitrate
async fn compress_precise(
    request: &JobRequest,
    params: &CompressParams,
    config: &AppConfig,
    outputs: &OutputManager,
    sink: &LogSink,
) -> Result<PathBuf, JobError> {
    let input = request.input_path.as_path();
    let plan = plan_for(input, params, config, sink).await?;
    let output = outputs.resolve(&format!(
        "{}_compressed_precise{}",
        input_stem(input),
        input_suffix(input)
    ));

    std::fs::create_dir_all(&config.passlog_dir)
        .map_err(|e| JobError::Io(format!("Failed to create pass log directory: {}", e)))?;
    let passlog = passlog_prefix(&config.passlog_dir, request.id);

    let passes = async {
        let first = run_tool(
            &config.ffmpeg,
            &first_pass_args(input, &plan, &passlog),
            "First pass",
            sink,
        )
        .await?;
        if first != Some(0) {
            sink.line("First pass exited with a non-zero status, continuing with the second pass");
        }

        run_tool(
            &config.ffmpeg,
            &second_pass_args(input, &output, &plan, &passlog),
            "Second pass",
            sink,
        )
        .await
    };
    let result = passes.await;

    let removed = cleanup_passlogs(&passlog);
    log::debug!("Removed {} pass log file(s) for job {}", removed, request.id);

    let output = finish(result?, output)?;
    sink.line(format!("Done: {}", output.display()));
    Ok(output)
}

/// Single-pass encode at the planned bitrate
async fn compress_fast(
    input: &Path,
    params: &CompressParams,
    config: &AppConfig,
    outputs: &OutputManager,
    sink: &LogSink,
) -> Result<PathBuf, JobError> {
    let plan = plan_for(input, params, config, sink).await?;
    let output = outputs.resolve(&format!(
        "{}_compressed_fast{}",
        input_stem(input),
        input_suffix(input)
    ));

    let code = run_tool(
        &config.ffmpeg,
        &fast_encode_args(input, &output, &plan),
        "Command (fast)",
        sink,
    )
    .await?;

    let output = finish(code, output)?;
    sink.line(format!("Done: {}", output.display()));
    Ok(output)
}

/// Tempo / EQ / gain pass into the requested audio format
async fn audio_edit(
    input: &Path,
    params: &AudioEditParams,
    config: &AppConfig,
    outputs: &OutputManager,
    sink: &LogSink,
) -> Result<PathBuf, JobError> {
    let output = outputs.resolve(&format!("{}_sound.{}", input_stem(input), params.extension));
    let chain = compose(params.speed, params.bass_db, params.treble_db, params.gain_db);
    let codec = audio_codec_for(&params.extension);

    if chain.is_empty() {
        sink.line("All controls are neutral, no filters applied");
    }

    let code = run_tool(
        &config.ffmpeg,
        &audio_edit_args(input, &output, &chain, codec, params.bitrate_kbps),
        "Command (equalizer)",
        sink,
    )
    .await?;

    let output = finish(code, output)?;
    sink.line(format!("Done: {}", output.display()));
    Ok(output)
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::conversion::background::drain_text;
    use crate::core::JobRequest;
    use crate::test_fixtures::{FakeTools, write_input};
    use tempfile::TempDir;

    fn compress(size: f64, audio: u32) -> CompressParams {
        CompressParams {
            target_size_mb: size,
            audio_kbps: audio,
        }
    }

    #[tokio::test]
    async fn test_missing_input_does_not_run_tool() {
        let temp_dir = TempDir::new().unwrap();
        let tools = FakeTools::new(temp_dir.path());
        let request = JobRequest::new(
            temp_dir.path().join("nope.mov"),
            Operation::Convert(ConvertParams {
                extension: "mp4".to_string(),
            }),
        );
        let (sink, rx) = LogSink::collecting();

        let result = run_job(&request, &tools.config, &sink).await;
        assert_eq!(
            result,
            Err(JobError::MissingInput(temp_dir.path().join("nope.mov")))
        );
        assert!(tools.ffmpeg_calls().is_empty());
        assert!(drain_text(&rx).is_empty());
    }

    #[tokio::test]
    async fn test_convert_stream_copy_success() {
        let temp_dir = TempDir::new().unwrap();
        let tools = FakeTools::new(temp_dir.path());
        let input = write_input(temp_dir.path(), "clip.mov");
        let request = JobRequest::new(
            input,
            Operation::Convert(ConvertParams {
                extension: "mp4".to_string(),
            }),
        );
        let (sink, rx) = LogSink::collecting();

        let output = run_job(&request, &tools.config, &sink).await.unwrap();
        assert_eq!(output, tools.config.output_dir.join("clip.mp4"));
        assert_eq!(tools.ffmpeg_calls().len(), 1);
        assert!(drain_text(&rx).iter().any(|l| l.starts_with("Done (stream copy)")));
    }

    #[tokio::test]
    async fn test_convert_falls_back_to_reencode() {
        let temp_dir = TempDir::new().unwrap();
        let tools = FakeTools::new(temp_dir.path()).failing_stream_copy();
        let input = write_input(temp_dir.path(), "clip.mov");
        let request = JobRequest::new(
            input,
            Operation::Convert(ConvertParams {
                extension: "mp4".to_string(),
            }),
        );
        let (sink, rx) = LogSink::collecting();

        let output = run_job(&request, &tools.config, &sink).await.unwrap();
        assert!(output.exists());

        let calls = tools.ffmpeg_calls();
        assert_eq!(calls.len(), 2);
        assert!(calls[0].contains("-c copy"));
        assert!(calls[1].contains("-c:v libx264 -preset medium -crf 23"));
        assert!(drain_text(&rx).iter().any(|l| l.starts_with("Done (re-encode)")));
    }

    #[tokio::test]
    async fn test_convert_dedups_existing_output() {
        let temp_dir = TempDir::new().unwrap();
        let tools = FakeTools::new(temp_dir.path());
        let input = write_input(temp_dir.path(), "clip.mov");
        std::fs::create_dir_all(&tools.config.output_dir).unwrap();
        std::fs::write(tools.config.output_dir.join("clip.mp4"), "old").unwrap();

        let request = JobRequest::new(
            input,
            Operation::Convert(ConvertParams {
                extension: "mp4".to_string(),
            }),
        );
        let (sink, _rx) = LogSink::collecting();

        let output = run_job(&request, &tools.config, &sink).await.unwrap();
        assert_eq!(output, tools.config.output_dir.join("clip_1.mp4"));
        assert_eq!(
            std::fs::read_to_string(tools.config.output_dir.join("clip.mp4")).unwrap(),
            "old"
        );
    }

    #[tokio::test]
    async fn test_missing_output_is_failure_even_on_zero_exit() {
        let temp_dir = TempDir::new().unwrap();
        let tools = FakeTools::new(temp_dir.path()).never_writing_output();
        let input = write_input(temp_dir.path(), "song.wav");
        let request = JobRequest::new(
            input,
            Operation::AudioEdit(AudioEditParams {
                extension: "mp3".to_string(),
                speed: 1.0,
                bass_db: 0,
                treble_db: 0,
                gain_db: 0,
                bitrate_kbps: 192,
            }),
        );
        let (sink, _rx) = LogSink::collecting();

        let result = run_job(&request, &tools.config, &sink).await;
        assert_eq!(
            result,
            Err(JobError::MissingOutput(tools.config.output_dir.join("song_sound.mp3")))
        );
    }

    #[tokio::test]
    async fn test_audio_edit_command_line() {
        let temp_dir = TempDir::new().unwrap();
        let tools = FakeTools::new(temp_dir.path());
        let input = write_input(temp_dir.path(), "song.wav");
        let request = JobRequest::new(
            input,
            Operation::AudioEdit(AudioEditParams {
                extension: "ogg".to_string(),
                speed: 0.25,
                bass_db: 0,
                treble_db: 0,
                gain_db: -6,
                bitrate_kbps: 160,
            }),
        );
        let (sink, _rx) = LogSink::collecting();

        let output = run_job(&request, &tools.config, &sink).await.unwrap();
        assert!(output.ends_with("song_sound.ogg"));

        let calls = tools.ffmpeg_calls();
        assert_eq!(calls.len(), 1);
        assert!(
            calls[0].contains("-af atempo=0.5,atempo=0.5,volume=-6dB -c:a libvorbis -b:a 160k")
        );
    }

    #[tokio::test]
    async fn test_probe_failure_aborts_before_encoding() {
        let temp_dir = TempDir::new().unwrap();
        let tools = FakeTools::new(temp_dir.path()).with_duration(None);
        let input = write_input(temp_dir.path(), "clip.mp4");
        let request = JobRequest::new(input.clone(), Operation::CompressFast(compress(10.0, 128)));
        let (sink, _rx) = LogSink::collecting();

        let result = run_job(&request, &tools.config, &sink).await;
        assert_eq!(result, Err(JobError::ProbeFailed(input)));
        assert!(tools.ffmpeg_calls().is_empty());
    }

    #[tokio::test]
    async fn test_compress_fast_uses_planned_bitrate() {
        let temp_dir = TempDir::new().unwrap();
        let tools = FakeTools::new(temp_dir.path()).with_duration(Some(100.0));
        let input = write_input(temp_dir.path(), "clip.mp4");
        let request = JobRequest::new(input, Operation::CompressFast(compress(10.0, 128)));
        let (sink, rx) = LogSink::collecting();

        let output = run_job(&request, &tools.config, &sink).await.unwrap();
        assert!(output.ends_with("clip_compressed_fast.mp4"));

        let calls = tools.ffmpeg_calls();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].contains("-b:v 710860 -preset fast -c:a aac -b:a 128k"));
        assert!(drain_text(&rx).iter().any(|l| l == "Duration: 100.00 s"));
    }

    #[tokio::test]
    async fn test_compress_reports_clamped_plan() {
        let temp_dir = TempDir::new().unwrap();
        let tools = FakeTools::new(temp_dir.path()).with_duration(Some(60.0));
        let input = write_input(temp_dir.path(), "clip.mp4");
        let request = JobRequest::new(input, Operation::CompressFast(compress(1.0, 320)));
        let (sink, rx) = LogSink::collecting();

        run_job(&request, &tools.config, &sink).await.unwrap();
        assert!(drain_text(&rx).iter().any(|l| l.starts_with("Warning:")));
    }

    #[tokio::test]
    async fn test_compress_precise_runs_both_passes_and_cleans_up() {
        let temp_dir = TempDir::new().unwrap();
        let tools = FakeTools::new(temp_dir.path())
            .with_duration(Some(100.0))
            .failing_first_pass();
        let input = write_input(temp_dir.path(), "clip.mp4");
        let request = JobRequest::new(input, Operation::CompressPrecise(compress(10.0, 128)));
        let (sink, rx) = LogSink::collecting();

        let output = run_job(&request, &tools.config, &sink).await.unwrap();
        assert!(output.ends_with("clip_compressed_precise.mp4"));

        let calls = tools.ffmpeg_calls();
        assert_eq!(calls.len(), 2);
        assert!(calls[0].contains("-pass 1"));
        assert!(calls[1].contains("-pass 2"));
        assert!(drain_text(&rx).iter().any(|l| l.starts_with("First pass exited")));

        // The fake encoder writes a stats file next to the pass log prefix
        let leftovers: Vec<_> = std::fs::read_dir(&tools.config.passlog_dir)
            .unwrap()
            .flatten()
            .collect();
        assert!(leftovers.is_empty());
    }

    #[tokio::test]
    async fn test_convert_fails_when_reencode_fails_after_failed_copy() {
        let temp_dir = TempDir::new().unwrap();
        let tools = FakeTools::new(temp_dir.path())
            .failing_stream_copy()
            .failing_encode();
        let input = write_input(temp_dir.path(), "clip.mov");
        let request = JobRequest::new(
            input,
            Operation::Convert(ConvertParams {
                extension: "mp4".to_string(),
            }),
        );
        let (sink, rx) = LogSink::collecting();

        let result = run_job(&request, &tools.config, &sink).await;
        assert_eq!(result, Err(JobError::ToolFailed(Some(1))));
        assert_eq!(tools.ffmpeg_calls().len(), 2);
        // Neither the empty file from the copy nor the re-encode leftover survives
        assert!(!tools.config.output_dir.join("clip.mp4").exists());
        assert!(!drain_text(&rx).iter().any(|l| l.starts_with("Done")));
    }

    #[tokio::test]
    async fn test_convert_discards_empty_copy_output_before_reencode() {
        let temp_dir = TempDir::new().unwrap();
        let tools = FakeTools::new(temp_dir.path())
            .failing_stream_copy()
            .never_writing_output();
        let input = write_input(temp_dir.path(), "clip.mov");
        let request = JobRequest::new(
            input,
            Operation::Convert(ConvertParams {
                extension: "mp4".to_string(),
            }),
        );
        let (sink, _rx) = LogSink::collecting();

        let result = run_job(&request, &tools.config, &sink).await;
        assert_eq!(
            result,
            Err(JobError::MissingOutput(tools.config.output_dir.join("clip.mp4")))
        );
    }

    #[tokio::test]
    async fn test_compress_fast_nonzero_exit_is_failure() {
        let temp_dir = TempDir::new().unwrap();
        let tools = FakeTools::new(temp_dir.path()).failing_encode();
        let input = write_input(temp_dir.path(), "clip.mp4");
        let request = JobRequest::new(input, Operation::CompressFast(compress(10.0, 128)));
        let (sink, _rx) = LogSink::collecting();

        let result = run_job(&request, &tools.config, &sink).await;
        assert_eq!(result, Err(JobError::ToolFailed(Some(1))));
        assert!(!tools.config.output_dir.join("clip_compressed_fast.mp4").exists());
    }

    #[tokio::test]
    async fn test_audio_edit_nonzero_exit_is_failure() {
        let temp_dir = TempDir::new().unwrap();
        let tools = FakeTools::new(temp_dir.path()).failing_encode();
        let input = write_input(temp_dir.path(), "song.wav");
        let request = JobRequest::new(
            input,
            Operation::AudioEdit(AudioEditParams {
                extension: "flac".to_string(),
                speed: 1.5,
                bass_db: 3,
                treble_db: 0,
                gain_db: 0,
                bitrate_kbps: 192,
            }),
        );
        let (sink, _rx) = LogSink::collecting();

        let result = run_job(&request, &tools.config, &sink).await;
        assert_eq!(result, Err(JobError::ToolFailed(Some(1))));
    }

    #[tokio::test]
    async fn test_compress_precise_second_pass_failure_still_cleans_up() {
        let temp_dir = TempDir::new().unwrap();
        let tools = FakeTools::new(temp_dir.path()).failing_encode();
        let input = write_input(temp_dir.path(), "clip.mp4");
        let request = JobRequest::new(input, Operation::CompressPrecise(compress(10.0, 128)));
        let (sink, _rx) = LogSink::collecting();

        let result = run_job(&request, &tools.config, &sink).await;
        assert_eq!(result, Err(JobError::ToolFailed(Some(1))));
        assert_eq!(tools.ffmpeg_calls().len(), 2);

        let leftovers: Vec<_> = std::fs::read_dir(&tools.config.passlog_dir)
            .unwrap()
            .flatten()
            .collect();
        assert!(leftovers.is_empty());
    }
}
