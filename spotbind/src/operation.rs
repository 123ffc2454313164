//! Catalogue of native operations the binding knows how to call.
//!
//! Each [`Operation`] carries its native symbol, parameter kinds and return
//! shape, so a call can be validated before it crosses the boundary.

use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::error::DispatchError;
use crate::value::{Arg, ArgKind, Shape};

use ArgKind::{Bool, Handle as H, Int, Size, Status as St, Str};

/// Static description of one native operation.
#[derive(Debug, Clone, Copy)]
pub struct Signature {
    pub name: &'static str,
    pub symbol: &'static str,
    pub params: &'static [ArgKind],
    pub returns: Shape,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    ErrorMessage,
    BuildId,

    SessionRelease,
    SessionLogin,
    SessionRelogin,
    SessionForgetMe,
    SessionLogout,
    SessionUser,
    SessionConnectionstate,
    SessionSetCacheSize,
    SessionPlayerLoad,
    SessionPlayerSeek,
    SessionPlayerPlay,
    SessionPlayerUnload,
    SessionPlayerPrefetch,
    SessionPlaylistcontainer,
    SessionPreferredBitrate,
    SessionFlushCaches,
    SessionUserName,
    SessionSetPrivateSession,
    SessionIsPrivateSession,
    OfflineTracksToSync,

    LinkCreateFromString,
    LinkAsTrack,
    LinkRelease,

    TrackIsLoaded,
    TrackError,
    TrackName,
    TrackDuration,
    TrackRelease,

    PlaylistRename,
    PlaylistNumTracks,
    PlaylistRelease,

    PlaylistcontainerRemovePlaylist,
    PlaylistcontainerMovePlaylist,
    PlaylistcontainerPlaylistFolderId,

    SearchError,
    SearchNumTracks,
    SearchRelease,

    ImageIsLoaded,
    ImageError,
    ImageRelease,
}

const fn sig(
    name: &'static str,
    symbol: &'static str,
    params: &'static [ArgKind],
    returns: Shape,
) -> Signature {
    Signature {
        name,
        symbol,
        params,
        returns,
    }
}

static BY_NAME: Lazy<HashMap<&'static str, Operation>> =
    Lazy::new(|| Operation::ALL.iter().map(|op| (op.name(), *op)).collect());

impl Operation {
    pub const ALL: [Operation; 42] = [
        Operation::ErrorMessage,
        Operation::BuildId,
        Operation::SessionRelease,
        Operation::SessionLogin,
        Operation::SessionRelogin,
        Operation::SessionForgetMe,
        Operation::SessionLogout,
        Operation::SessionUser,
        Operation::SessionConnectionstate,
        Operation::SessionSetCacheSize,
        Operation::SessionPlayerLoad,
        Operation::SessionPlayerSeek,
        Operation::SessionPlayerPlay,
        Operation::SessionPlayerUnload,
        Operation::SessionPlayerPrefetch,
        Operation::SessionPlaylistcontainer,
        Operation::SessionPreferredBitrate,
        Operation::SessionFlushCaches,
        Operation::SessionUserName,
        Operation::SessionSetPrivateSession,
        Operation::SessionIsPrivateSession,
        Operation::OfflineTracksToSync,
        Operation::LinkCreateFromString,
        Operation::LinkAsTrack,
        Operation::LinkRelease,
        Operation::TrackIsLoaded,
        Operation::TrackError,
        Operation::TrackName,
        Operation::TrackDuration,
        Operation::TrackRelease,
        Operation::PlaylistRename,
        Operation::PlaylistNumTracks,
        Operation::PlaylistRelease,
        Operation::PlaylistcontainerRemovePlaylist,
        Operation::PlaylistcontainerMovePlaylist,
        Operation::PlaylistcontainerPlaylistFolderId,
        Operation::SearchError,
        Operation::SearchNumTracks,
        Operation::SearchRelease,
        Operation::ImageIsLoaded,
        Operation::ImageError,
        Operation::ImageRelease,
    ];

    pub fn signature(self) -> Signature {
        match self {
            Operation::ErrorMessage => sig("error_message", "sp_error_message", &[St], Shape::Str),
            Operation::BuildId => sig("build_id", "sp_build_id", &[], Shape::Str),

            Operation::SessionRelease => sig("session_release", "sp_session_release", &[H], Shape::Status),
            Operation::SessionLogin => sig(
                "session_login",
                "sp_session_login",
                &[H, Str, Str, Bool, Str],
                Shape::Status,
            ),
            Operation::SessionRelogin => sig("session_relogin", "sp_session_relogin", &[H], Shape::Status),
            Operation::SessionForgetMe => sig("session_forget_me", "sp_session_forget_me", &[H], Shape::Status),
            Operation::SessionLogout => sig("session_logout", "sp_session_logout", &[H], Shape::Status),
            Operation::SessionUser => sig("session_user", "sp_session_user", &[H], Shape::Handle),
            Operation::SessionConnectionstate => {
                sig("session_connectionstate", "sp_session_connectionstate", &[H], Shape::Int)
            }
            Operation::SessionSetCacheSize => {
                sig("session_set_cache_size", "sp_session_set_cache_size", &[H, Size], Shape::Status)
            }
            Operation::SessionPlayerLoad => {
                sig("session_player_load", "sp_session_player_load", &[H, H], Shape::Status)
            }
            Operation::SessionPlayerSeek => {
                sig("session_player_seek", "sp_session_player_seek", &[H, Int], Shape::Status)
            }
            Operation::SessionPlayerPlay => {
                sig("session_player_play", "sp_session_player_play", &[H, Bool], Shape::Status)
            }
            Operation::SessionPlayerUnload => {
                sig("session_player_unload", "sp_session_player_unload", &[H], Shape::Status)
            }
            Operation::SessionPlayerPrefetch => {
                sig("session_player_prefetch", "sp_session_player_prefetch", &[H, H], Shape::Status)
            }
            Operation::SessionPlaylistcontainer => {
                sig("session_playlistcontainer", "sp_session_playlistcontainer", &[H], Shape::Handle)
            }
            Operation::SessionPreferredBitrate => sig(
                "session_preferred_bitrate",
                "sp_session_preferred_bitrate",
                &[H, Int],
                Shape::Status,
            ),
            Operation::SessionFlushCaches => {
                sig("session_flush_caches", "sp_session_flush_caches", &[H], Shape::Status)
            }
            Operation::SessionUserName => sig("session_user_name", "sp_session_user_name", &[H], Shape::Str),
            Operation::SessionSetPrivateSession => sig(
                "session_set_private_session",
                "sp_session_set_private_session",
                &[H, Bool],
                Shape::Status,
            ),
            Operation::SessionIsPrivateSession => {
                sig("session_is_private_session", "sp_session_is_private_session", &[H], Shape::Bool)
            }
            Operation::OfflineTracksToSync => {
                sig("offline_tracks_to_sync", "sp_offline_tracks_to_sync", &[H], Shape::Int)
            }

            Operation::LinkCreateFromString => {
                sig("link_create_from_string", "sp_link_create_from_string", &[Str], Shape::Handle)
            }
            Operation::LinkAsTrack => sig("link_as_track", "sp_link_as_track", &[H], Shape::Handle),
            Operation::LinkRelease => sig("link_release", "sp_link_release", &[H], Shape::Status),

            Operation::TrackIsLoaded => sig("track_is_loaded", "sp_track_is_loaded", &[H], Shape::Bool),
            Operation::TrackError => sig("track_error", "sp_track_error", &[H], Shape::Status),
            Operation::TrackName => sig("track_name", "sp_track_name", &[H], Shape::Str),
            Operation::TrackDuration => sig("track_duration", "sp_track_duration", &[H], Shape::Int),
            Operation::TrackRelease => sig("track_release", "sp_track_release", &[H], Shape::Status),

            Operation::PlaylistRename => sig("playlist_rename", "sp_playlist_rename", &[H, Str], Shape::Status),
            Operation::PlaylistNumTracks => {
                sig("playlist_num_tracks", "sp_playlist_num_tracks", &[H], Shape::Int)
            }
            Operation::PlaylistRelease => sig("playlist_release", "sp_playlist_release", &[H], Shape::Status),

            Operation::PlaylistcontainerRemovePlaylist => sig(
                "playlistcontainer_remove_playlist",
                "sp_playlistcontainer_remove_playlist",
                &[H, Int],
                Shape::Status,
            ),
            Operation::PlaylistcontainerMovePlaylist => sig(
                "playlistcontainer_move_playlist",
                "sp_playlistcontainer_move_playlist",
                &[H, Int, Int, Bool],
                Shape::Status,
            ),
            Operation::PlaylistcontainerPlaylistFolderId => sig(
                "playlistcontainer_playlist_folder_id",
                "sp_playlistcontainer_playlist_folder_id",
                &[H, Int],
                Shape::UInt,
            ),

            Operation::SearchError => sig("search_error", "sp_search_error", &[H], Shape::Status),
            Operation::SearchNumTracks => sig("search_num_tracks", "sp_search_num_tracks", &[H], Shape::Int),
            Operation::SearchRelease => sig("search_release", "sp_search_release", &[H], Shape::Status),

            Operation::ImageIsLoaded => sig("image_is_loaded", "sp_image_is_loaded", &[H], Shape::Bool),
            Operation::ImageError => sig("image_error", "sp_image_error", &[H], Shape::Status),
            Operation::ImageRelease => sig("image_release", "sp_image_release", &[H], Shape::Status),
        }
    }

    /// Binding-level name, e.g. `session_logout`.
    pub fn name(self) -> &'static str {
        self.signature().name
    }

    /// Exported native symbol, e.g. `sp_session_logout`.
    pub fn symbol(self) -> &'static str {
        self.signature().symbol
    }

    pub fn params(self) -> &'static [ArgKind] {
        self.signature().params
    }

    pub fn returns(self) -> Shape {
        self.signature().returns
    }

    /// Whether the native side may invoke a registered callback during this
    /// call. Which calls can do so is not documented, so every call is
    /// treated as one that can.
    pub fn may_call_back(self) -> bool {
        true
    }

    pub fn from_name(name: &str) -> Option<Operation> {
        BY_NAME.get(name).copied()
    }

    /// Resolve `name`, failing with [`DispatchError::UnknownOperation`].
    pub fn lookup(name: &str) -> Result<Operation, DispatchError> {
        Self::from_name(name).ok_or_else(|| DispatchError::UnknownOperation(name.to_string()))
    }

    /// Validate arity and argument kinds against the signature.
    pub fn check_args(self, args: &[Arg]) -> Result<(), DispatchError> {
        let params = self.params();
        if params.len() != args.len() {
            return Err(DispatchError::ArgumentCount {
                op: self.name(),
                expected: params.len(),
                got: args.len(),
            });
        }
        for (index, (arg, kind)) in args.iter().zip(params).enumerate() {
            if !arg.fits(*kind) {
                return Err(DispatchError::ArgumentKind {
                    op: self.name(),
                    index,
                    expected: kind.name(),
                    got: arg.kind_name(),
                });
            }
        }
        Ok(())
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
