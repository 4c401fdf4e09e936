//! Playlist randomization

use cadence_core::TrackDescriptor;
use rand::seq::SliceRandom;
use rand::thread_rng;

/// Uniform in-place shuffle (Fisher-Yates)
pub fn shuffle_tracks(tracks: &mut [TrackDescriptor]) {
    let mut rng = thread_rng();
    tracks.shuffle(&mut rng);
}
