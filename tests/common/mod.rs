//! Shared fixtures for integration tests.
//!
//! Builds the per-tool track collections and packet lists the analysis
//! pipeline consumes, mirroring what the adapter layer hands over for a
//! typical Matroska release.

#![allow(dead_code)]

use mediasift::analysis::AnalysisInput;
use mediasift_core::{MediaInfo, Packet, Parser, Track, TrackKind};

/// Build a collection from `(kind, id, format, language)` rows.
pub fn media(parser: Parser, rows: &[(TrackKind, u32, Option<&str>, Option<&str>)]) -> MediaInfo {
    let mut info = MediaInfo::new(parser);
    for &(kind, id, format, language) in rows {
        let mut track = Track::new(kind, id);
        if let Some(format) = format {
            track = track.with_format(format);
        }
        if let Some(language) = language {
            track = track.with_language(language);
        }
        info.push(track);
    }
    info
}

/// A film with one video, three audio and three subtitle tracks as seen by
/// the primary tool.
pub fn film_tracks() -> MediaInfo {
    media(
        Parser::FfProbe,
        &[
            (TrackKind::Video, 0, Some("hevc"), None),
            (TrackKind::Audio, 1, Some("truehd"), Some("en-US")),
            (TrackKind::Audio, 2, Some("ac3"), Some("fr")),
            (TrackKind::Audio, 3, Some("ac3"), Some("en")),
            (TrackKind::Subtitle, 4, Some("subrip"), Some("en")),
            (TrackKind::Subtitle, 5, Some("hdmv_pgs_subtitle"), Some("zh-Hans")),
            (TrackKind::Subtitle, 6, Some("subrip"), None),
        ],
    )
}

/// The same film as labeled by the three tools.
pub fn film_input() -> AnalysisInput {
    let mut ffprobe = film_tracks();
    if let Some(commentary) = ffprobe.audio.iter_mut().find(|t| t.id == 3) {
        *commentary = commentary.clone().with_title("Director's Commentary");
    }

    let mkvmerge = media(
        Parser::MkvMerge,
        &[
            (TrackKind::Video, 0, Some("HEVC/H.265/MPEG-H"), None),
            (TrackKind::Audio, 1, Some("TrueHD Atmos"), Some("en-US")),
            (TrackKind::Audio, 2, Some("AC-3"), Some("fr")),
            (TrackKind::Audio, 3, Some("AC-3"), Some("en")),
            (TrackKind::Subtitle, 4, Some("SubRip/SRT"), Some("en")),
            (TrackKind::Subtitle, 5, Some("HDMV PGS"), Some("zh-Hans")),
            (TrackKind::Subtitle, 6, Some("SubRip/SRT"), None),
        ],
    );
    let mediainfo = media(
        Parser::MediaInfo,
        &[
            (TrackKind::Video, 0, Some("HEVC"), None),
            (TrackKind::Audio, 1, Some("MLP FBA 16-ch"), Some("en-US")),
            (TrackKind::Audio, 2, Some("AC-3"), Some("fr")),
            (TrackKind::Audio, 3, Some("AC-3"), Some("en")),
            (TrackKind::Subtitle, 4, Some("UTF-8"), Some("en")),
            (TrackKind::Subtitle, 5, Some("PGS"), Some("zh-Hans")),
            (TrackKind::Subtitle, 6, Some("UTF-8"), None),
        ],
    );

    AnalysisInput {
        ffprobe,
        mkvmerge,
        mediainfo,
        packets: steady_packets(4, 1000, 200),
        duration: Some(4.0),
    }
}

/// `seconds` of interleaved video (stream 0) and audio (stream 1) packets,
/// four video and two audio packets per second.
pub fn steady_packets(seconds: u32, video_bytes: u64, audio_bytes: u64) -> Vec<Packet> {
    let mut packets = Vec::new();
    for second in 0..seconds {
        for step in 0..4 {
            let pts = f64::from(second) + 0.1 + f64::from(step) * 0.25;
            packets.push(
                Packet::new(0, pts, video_bytes / 4)
                    .with_codec_type("video")
                    .with_duration(0.25),
            );
            if step % 2 == 0 {
                packets.push(
                    Packet::new(1, pts, audio_bytes / 2)
                        .with_codec_type("audio")
                        .with_duration(0.5),
                );
            }
        }
    }
    packets
}
