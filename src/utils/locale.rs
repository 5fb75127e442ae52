//! Guild-selectable locales and the static string table behind every
//! user-facing response.

use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Locale a guild has chosen for bot responses.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, poise::ChoiceParameter,
)]
pub enum Locale {
    #[default]
    #[serde(rename = "en")]
    #[name = "English"]
    English,
    #[serde(rename = "ru")]
    #[name = "Русский"]
    Russian,
}

/// Keys into the string table. Every key must be translated for every locale
/// and listed in [`Text::ALL`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Text {
    NoPlayer,
    NoTrack,
    EmptyQueue,
    Paused,
    Resumed,
    Skipped,
    Stopped,
    Left,
    Looped,
    Unlooped,
    Shuffled,
    VolumeSet,
    WrongVoiceChannel,
    NoVoiceChannel,
    LinkLabel,
    By,
    QueueTitle,
    QueueEmpty,
    NowPlaying,
    Enqueued,
    Duration,
    NoResults,
    InvalidLink,
    LocaleSet,
    PanelOpened,
    SomethingWentWrong,
    PlaylistExists,
    PlaylistNotFound,
    PlaylistInvalidName,
    PlaylistNotOwner,
    PlaylistNotContributor,
    PlaylistsEmpty,
    PlaylistWrongPage,
    PlaylistNoTracks,
    PlaylistTrackNotFound,
    PlaylistCreated,
    Page,
    MyPlaylists,
    SharedPlaylists,
    PlaylistSearchTitle,
    PlaylistTitle,
    Owner,
    Contributors,
    TrackCount,
    PlaylistPick,
    TrackAdded,
    TrackRemoved,
    PlaylistQueued,
    PlayLabel,
    ShuffleLabel,
    RefreshLabel,
    DeleteLabel,
    ConfirmationTitle,
    DeleteConfirm,
    PlaylistDeleted,
    PlaylistRenamed,
    ContributorAdded,
    ContributorRemoved,
    ContributorUnchanged,
}

impl Text {
    pub const ALL: [Text; 59] = [
        Text::NoPlayer,
        Text::NoTrack,
        Text::EmptyQueue,
        Text::Paused,
        Text::Resumed,
        Text::Skipped,
        Text::Stopped,
        Text::Left,
        Text::Looped,
        Text::Unlooped,
        Text::Shuffled,
        Text::VolumeSet,
        Text::WrongVoiceChannel,
        Text::NoVoiceChannel,
        Text::LinkLabel,
        Text::By,
        Text::QueueTitle,
        Text::QueueEmpty,
        Text::NowPlaying,
        Text::Enqueued,
        Text::Duration,
        Text::NoResults,
        Text::InvalidLink,
        Text::LocaleSet,
        Text::PanelOpened,
        Text::SomethingWentWrong,
        Text::PlaylistExists,
        Text::PlaylistNotFound,
        Text::PlaylistInvalidName,
        Text::PlaylistNotOwner,
        Text::PlaylistNotContributor,
        Text::PlaylistsEmpty,
        Text::PlaylistWrongPage,
        Text::PlaylistNoTracks,
        Text::PlaylistTrackNotFound,
        Text::PlaylistCreated,
        Text::Page,
        Text::MyPlaylists,
        Text::SharedPlaylists,
        Text::PlaylistSearchTitle,
        Text::PlaylistTitle,
        Text::Owner,
        Text::Contributors,
        Text::TrackCount,
        Text::PlaylistPick,
        Text::TrackAdded,
        Text::TrackRemoved,
        Text::PlaylistQueued,
        Text::PlayLabel,
        Text::ShuffleLabel,
        Text::RefreshLabel,
        Text::DeleteLabel,
        Text::ConfirmationTitle,
        Text::DeleteConfirm,
        Text::PlaylistDeleted,
        Text::PlaylistRenamed,
        Text::ContributorAdded,
        Text::ContributorRemoved,
        Text::ContributorUnchanged,
    ];
}

impl Locale {
    /// Short language code, as stored in the bot data file.
    pub fn code(self) -> &'static str {
        match self {
            Locale::English => "en",
            Locale::Russian => "ru",
        }
    }

    pub fn text(self, key: Text) -> &'static str {
        match self {
            Locale::English => english(key),
            Locale::Russian => russian(key),
        }
    }

    /// Looks up a template containing a single `{}` placeholder and fills it.
    pub fn format(self, key: Text, arg: impl Display) -> String {
        self.text(key).replacen("{}", &arg.to_string(), 1)
    }
}

fn english(key: Text) -> &'static str {
    match key {
        Text::NoPlayer => "There is no active player in this server.",
        Text::NoTrack => "Nothing is playing right now.",
        Text::EmptyQueue => "The queue is empty.",
        Text::Paused => "Playback paused.",
        Text::Resumed => "Playback resumed.",
        Text::Skipped => "Skipped the current track.",
        Text::Stopped => "Playback stopped.",
        Text::Left => "Left the voice channel.",
        Text::Looped => "Looping the current track.",
        Text::Unlooped => "Looping disabled.",
        Text::Shuffled => "Queue shuffled.",
        Text::VolumeSet => "Volume set to {}%.",
        Text::WrongVoiceChannel => "You have to be in the same voice channel as the bot.",
        Text::NoVoiceChannel => "You have to join a voice channel first.",
        Text::LinkLabel => "Link",
        Text::By => "by",
        Text::QueueTitle => "Queue",
        Text::QueueEmpty => "Nothing is queued.",
        Text::NowPlaying => "Now playing: {}",
        Text::Enqueued => "Enqueued",
        Text::Duration => "Duration",
        Text::NoResults => "Nothing was found.",
        Text::InvalidLink => "That link could not be loaded.",
        Text::LocaleSet => "Language set to English.",
        Text::PanelOpened => "Player controls opened.",
        Text::SomethingWentWrong => "Something went wrong, please try again.",
        Text::PlaylistExists => "You already have a playlist with that name.",
        Text::PlaylistNotFound => "That playlist does not exist.",
        Text::PlaylistInvalidName => "Playlist names must be 1 to 100 characters long.",
        Text::PlaylistNotOwner => "Only the owner can change this playlist.",
        Text::PlaylistNotContributor => "You are not allowed to add tracks to this playlist.",
        Text::PlaylistsEmpty => "No playlists yet.",
        Text::PlaylistWrongPage => "There is no such page.",
        Text::PlaylistNoTracks => "This playlist has no tracks.",
        Text::PlaylistTrackNotFound => "There is no track at that position.",
        Text::PlaylistCreated => "Created the playlist {}.",
        Text::Page => "Page {}",
        Text::MyPlaylists => "Your playlists",
        Text::SharedPlaylists => "All playlists",
        Text::PlaylistSearchTitle => "Playlists matching \"{}\"",
        Text::PlaylistTitle => "Playlist: {}",
        Text::Owner => "Owner: {}",
        Text::Contributors => "Contributors: {}",
        Text::TrackCount => "Tracks: {}",
        Text::PlaylistPick => "Pick a track to add to {}",
        Text::TrackAdded => "Added {} to the playlist.",
        Text::TrackRemoved => "Removed {} from the playlist.",
        Text::PlaylistQueued => "Queued {} tracks from the playlist.",
        Text::PlayLabel => "Play",
        Text::ShuffleLabel => "Shuffle",
        Text::RefreshLabel => "Refresh",
        Text::DeleteLabel => "Delete",
        Text::ConfirmationTitle => "Are you sure?",
        Text::DeleteConfirm => "Delete the playlist {}? This cannot be undone.",
        Text::PlaylistDeleted => "Deleted the playlist {}.",
        Text::PlaylistRenamed => "The playlist is now called {}.",
        Text::ContributorAdded => "{} can now add tracks.",
        Text::ContributorRemoved => "{} can no longer add tracks.",
        Text::ContributorUnchanged => "Nothing changed.",
    }
}

fn russian(key: Text) -> &'static str {
    match key {
        Text::NoPlayer => "На этом сервере нет активного плеера.",
        Text::NoTrack => "Сейчас ничего не играет.",
        Text::EmptyQueue => "Очередь пуста.",
        Text::Paused => "Воспроизведение приостановлено.",
        Text::Resumed => "Воспроизведение продолжено.",
        Text::Skipped => "Текущий трек пропущен.",
        Text::Stopped => "Воспроизведение остановлено.",
        Text::Left => "Бот покинул голосовой канал.",
        Text::Looped => "Текущий трек зациклен.",
        Text::Unlooped => "Повтор выключен.",
        Text::Shuffled => "Очередь перемешана.",
        Text::VolumeSet => "Громкость установлена на {}%.",
        Text::WrongVoiceChannel => "Вы должны находиться в том же голосовом канале, что и бот.",
        Text::NoVoiceChannel => "Сначала зайдите в голосовой канал.",
        Text::LinkLabel => "Ссылка",
        Text::By => "от",
        Text::QueueTitle => "Очередь",
        Text::QueueEmpty => "В очереди ничего нет.",
        Text::NowPlaying => "Сейчас играет: {}",
        Text::Enqueued => "Добавлено в очередь",
        Text::Duration => "Длительность",
        Text::NoResults => "Ничего не найдено.",
        Text::InvalidLink => "Не удалось загрузить ссылку.",
        Text::LocaleSet => "Язык изменён на русский.",
        Text::PanelOpened => "Панель управления открыта.",
        Text::SomethingWentWrong => "Что-то пошло не так, попробуйте ещё раз.",
        Text::PlaylistExists => "У вас уже есть плейлист с таким названием.",
        Text::PlaylistNotFound => "Такого плейлиста не существует.",
        Text::PlaylistInvalidName => "Название плейлиста должно содержать от 1 до 100 символов.",
        Text::PlaylistNotOwner => "Изменять этот плейлист может только его владелец.",
        Text::PlaylistNotContributor => "Вам нельзя добавлять треки в этот плейлист.",
        Text::PlaylistsEmpty => "Плейлистов пока нет.",
        Text::PlaylistWrongPage => "Такой страницы нет.",
        Text::PlaylistNoTracks => "В этом плейлисте нет треков.",
        Text::PlaylistTrackNotFound => "На этой позиции нет трека.",
        Text::PlaylistCreated => "Плейлист {} создан.",
        Text::Page => "Страница {}",
        Text::MyPlaylists => "Ваши плейлисты",
        Text::SharedPlaylists => "Все плейлисты",
        Text::PlaylistSearchTitle => "Плейлисты по запросу «{}»",
        Text::PlaylistTitle => "Плейлист: {}",
        Text::Owner => "Владелец: {}",
        Text::Contributors => "Участники: {}",
        Text::TrackCount => "Треков: {}",
        Text::PlaylistPick => "Выберите трек для добавления в {}",
        Text::TrackAdded => "Трек {} добавлен в плейлист.",
        Text::TrackRemoved => "Трек {} удалён из плейлиста.",
        Text::PlaylistQueued => "Добавлено в очередь треков из плейлиста: {}.",
        Text::PlayLabel => "Играть",
        Text::ShuffleLabel => "Перемешать",
        Text::RefreshLabel => "Обновить",
        Text::DeleteLabel => "Удалить",
        Text::ConfirmationTitle => "Вы уверены?",
        Text::DeleteConfirm => "Удалить плейлист {}? Это действие нельзя отменить.",
        Text::PlaylistDeleted => "Плейлист {} удалён.",
        Text::PlaylistRenamed => "Плейлист переименован в {}.",
        Text::ContributorAdded => "{} теперь может добавлять треки.",
        Text::ContributorRemoved => "{} больше не может добавлять треки.",
        Text::ContributorUnchanged => "Ничего не изменилось.",
    }
}
