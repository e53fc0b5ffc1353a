//! Raw PCM to MP3 through an external `ffmpeg`.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use h4r_archive::{Error, Result, SoundInfo, Transcode};

/// Runs `ffmpeg` on extracted raw PCM sound.
///
/// Raw game sound is assumed to be signed 16-bit big-endian samples. This has
/// not been checked against every archive.
#[derive(Debug, Clone)]
pub struct FfmpegTranscoder {
    program: PathBuf,
}

impl FfmpegTranscoder {
    pub fn new<P: Into<PathBuf>>(program: P) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn command(&self, input: &Path, info: &SoundInfo, output: &Path) -> Command {
        let mut command = Command::new(&self.program);
        command
            .args(["-hide_banner", "-loglevel", "error"])
            .args(["-f", "s16be", "-acodec", "pcm_s16be"])
            .arg("-ar")
            .arg(info.sample_rate.to_string())
            .arg("-ac")
            .arg(info.channels.to_string())
            .arg("-i")
            .arg(input)
            .arg("-y")
            .arg(output)
            .stdin(Stdio::null());
        command
    }
}

impl Transcode for FfmpegTranscoder {
    fn extension(&self) -> &str {
        "mp3"
    }

    fn transcode(&self, input: &Path, info: &SoundInfo, output: &Path) -> Result<()> {
        let result = self
            .command(input, info, output)
            .output()
            .map_err(|e| Error::Transcode(format!("{}: {e}", self.program.display())))?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            return Err(Error::Transcode(format!(
                "{} exited with {}: {}",
                self.program.display(),
                result.status,
                stderr.trim()
            )));
        }

        log::debug!("Transcoded {} -> {}", input.display(), output.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use h4r_archive::SoundKind;

    #[test]
    fn test_command_arguments() {
        let info = SoundInfo {
            kind: SoundKind::RawPcm,
            bits_per_sample: 16,
            channels: 2,
            sample_rate: 22050,
            data_size: 0,
        };
        let transcoder = FfmpegTranscoder::new("ffmpeg");
        let command = transcoder.command(Path::new("in.pcm"), &info, Path::new("out.mp3"));

        let args: Vec<String> = command
            .get_args()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();
        let position = |flag: &str| args.iter().position(|a| a == flag).unwrap();

        assert_eq!(args[position("-f") + 1], "s16be");
        assert_eq!(args[position("-ar") + 1], "22050");
        assert_eq!(args[position("-ac") + 1], "2");
        assert_eq!(args[position("-i") + 1], "in.pcm");
        assert_eq!(args.last().unwrap(), "out.mp3");
    }

    #[test]
    fn test_missing_program_is_a_transcode_error() {
        let info = SoundInfo {
            kind: SoundKind::RawPcm,
            bits_per_sample: 16,
            channels: 1,
            sample_rate: 22050,
            data_size: 0,
        };
        let transcoder = FfmpegTranscoder::new("/nonexistent/ffmpeg-h4r-test");

        let result = transcoder.transcode(Path::new("in.pcm"), &info, Path::new("out.mp3"));
        assert!(matches!(result, Err(Error::Transcode(_))));
    }
}
