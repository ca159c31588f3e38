//! The dashboard's built-in views and the templates behind its text blocks.

use crate::core::BASICS_KEY;
use crate::render::{MultiSeriesOptions, Renderer, SeriesOptions, TableOptions};

use super::registry::{ViewDefinition, ViewRegistry, HOME_VIEW};

/// Cache key of the random sample rows.
pub const SAMPLE_VIEW: &str = "sample_data";

/// Intro paragraph above the tabs. Rewritten to address the visitor once
/// their own data is shown.
pub const INTRODUCTION: &str = r#"<p>I have been streaming music for years and requested my extended streaming history. These are the statistics I found in it. My data is shown until you upload your own archive at the bottom of this page.</p>"#;

pub const BASIC_TEXT: &str = r#"
<ul>
<li>My top three artists are: <span class="highlight">{top_1_artist}</span>, <span class="highlight">{top_2_artist}</span> and <span class="highlight">{top_3_artist}</span>.</li>
<li>My top three songs are: <span class="highlight">{top_1_track}</span>, <span class="highlight">{top_2_track}</span> and <span class="highlight">{top_3_track}</span>.</li>
<li>I listened to <span class="highlight">{played_songs}</span> songs in <span class="highlight">{listening_hours}</span> hours.</li>
<li>I played <span class="highlight">{unique_artists_played}</span> unique artists and <span class="highlight">{unique_albums_played}</span> unique albums.</li>
<li>On average, I played a song <span class="highlight">{average_play_count_per_song}</span> times.</li>
<li>I skipped <span class="highlight">{percent_of_skipped_songs}%</span> of all started songs and <span class="highlight">{percent_of_played_songs_using_shuffle}%</span> of all songs I listened to were played using shuffle.</li>
</ul>
"#;

pub const ADVANCED_BASIC_TEXT: &str = r#"
<ul>
<li>My records begin on {first_day} and end on {last_day}. That's a span of {number_of_days} days.</li>
<li>I played songs on {number_of_days_with_tracks_played} days, which account for {percent_of_days_with_tracks_played}% of all days.</li>
<li>I played {played_songs} songs, totaling {listening_hours} hours. That's an average of about {played_songs_per_day} tracks or {listening_hours_per_day} hours per day.</li>
<li>I have listened to {unique_tracks_played} unique songs, from {unique_artists_played} artists and {unique_albums_played} albums. That's an average of about {unique_tracks_played_per_artist} songs per artist.</li>
<li>I play a song, on average, {average_play_count_per_song} times.</li>
<li>About {percent_of_played_songs_using_shuffle}% of all songs I listened to were played using shuffle.</li>
<li>I skipped {skipped_songs} songs, which is about {percent_of_skipped_songs}% of all songs I started.</li>
<li>On average, I listen to a song for {avg_seconds_played_before_skipping} seconds before skipping it. Of the songs I skip, {percent_of_songs_skipped_before_3s}% are skipped within 3 seconds, while {percent_of_songs_skipped_after_30s}% are skipped after more than 30 seconds and {percent_of_songs_skipped_after_120s}% after more than 2 minutes.</li>
<li>I skip {percent_of_skipped_songs_using_shuffle}% of all started songs when using shuffle and {percent_of_skipped_songs_not_using_shuffle}% when not using shuffle.</li>
<li>I started {percent_reason_start_forward_button}% of my songs because I clicked the forward button, {percent_reason_start_back_button}% because I clicked the back button, {percent_reason_start_trackdone}% because the previous song ended and {percent_reason_start_clickrow}% because I clicked on the song.</li>
<li>I played {percent_of_played_songs_using_incognito_mode}% of my songs using incognito mode.</li>
</ul>
"#;

pub const TOP_ARTISTS_AND_SONGS_TEXT: &str = r#"
<ul>
<li>My top 10 artists contribute to {top_10_artist_play_count_percent}% of my played songs.</li>
<li>My top 100 artists contribute to {top_100_artist_play_count_percent}% of my played songs.</li>
<li>My top 500 artists contribute to {top_500_artist_play_count_percent}% of my played songs.</li>
<li>My top 10 songs contribute to {top_10_track_play_count_percent}% of my played songs.</li>
<li>My top 100 songs contribute to {top_100_track_play_count_percent}% of my played songs.</li>
<li>My top 500 songs contribute to {top_500_track_play_count_percent}% of my played songs.</li>
</ul>
"#;

fn hours_plot(title: &str, dataset: &str) -> Renderer {
    Renderer::plot(title, dataset, SeriesOptions::hours())
}

impl ViewRegistry {
    pub fn default_views() -> Self {
        ViewRegistry::new(vec![
            ViewDefinition::new(HOME_VIEW, vec![Renderer::text(BASIC_TEXT, BASICS_KEY)]),
            ViewDefinition::new("general", vec![Renderer::text(ADVANCED_BASIC_TEXT, BASICS_KEY)]),
            ViewDefinition::new(
                "most played artists",
                vec![Renderer::table(
                    "most played artists",
                    "most_played_artists_total",
                    TableOptions::ranked(),
                )],
            ),
            ViewDefinition::new(
                "most played songs",
                vec![Renderer::table(
                    "most played songs",
                    "most_played_tracks_total",
                    TableOptions::ranked(),
                )],
            ),
            ViewDefinition::new(
                "most played albums",
                vec![Renderer::table(
                    "most played albums",
                    "most_played_albums_total",
                    TableOptions::ranked(),
                )],
            ),
            ViewDefinition::new(
                "most played per month",
                vec![Renderer::table(
                    "most played artist, song and album per month",
                    "most_played_artists_track_album_monthly",
                    TableOptions::default(),
                )],
            ),
            ViewDefinition::new(
                "song stats",
                vec![
                    Renderer::plot(
                        "average play count per song each year",
                        "avg_play_count_per_song_yearly",
                        SeriesOptions::yearly(),
                    ),
                    Renderer::plot(
                        "distribution of how many songs are played how often",
                        "play_count_distribution",
                        SeriesOptions::default(),
                    ),
                ],
            ),
            ViewDefinition::new(
                "unique and new played songs",
                vec![Renderer::multi_plot(
                    "yearly song play count",
                    "yearly_track_play_count",
                    "songs played",
                    MultiSeriesOptions::default(),
                )],
            ),
            ViewDefinition::new(
                "cumulative play count",
                vec![
                    Renderer::text(TOP_ARTISTS_AND_SONGS_TEXT, BASICS_KEY),
                    Renderer::plot(
                        "cumulative play count by artist count in percent of all played songs",
                        "cumulative_percent_play_count_artist",
                        SeriesOptions::scatter(),
                    ),
                    Renderer::plot(
                        "cumulative play count by song count in percent of all played songs",
                        "cumulative_percent_play_count_track",
                        SeriesOptions::scatter(),
                    ),
                ],
            ),
            ViewDefinition::new(
                "play time per day",
                vec![
                    hours_plot(
                        "average hours played per day per year and month",
                        "avg_hours_played_per_year_month",
                    ),
                    hours_plot("average hours played per day per year", "avg_hours_played_per_year"),
                    hours_plot("average hours played per day per month", "avg_hours_played_per_month"),
                    hours_plot(
                        "average hours played per day per weekday",
                        "avg_hours_played_per_day_name",
                    ),
                    Renderer::plot(
                        "percent of play time per hour of the day",
                        "hours_played_percent_per_hour_of_the_day",
                        SeriesOptions::default(),
                    ),
                ],
            ),
            ViewDefinition::new(
                "songs of top artists",
                vec![Renderer::table(
                    "top songs of the top artists",
                    "top_songs_of_top_artists",
                    TableOptions::unsorted(),
                )],
            ),
            ViewDefinition::new(
                "most played songs clicked on",
                vec![Renderer::table(
                    "most played songs that started because they were clicked on",
                    "most_played_tracks_total_reason_start_clickrow",
                    TableOptions::ranked(),
                )],
            ),
            ViewDefinition::new(
                "countries",
                vec![Renderer::table(
                    "plays per country in total",
                    "plays_per_county_total",
                    TableOptions::default(),
                )],
            ),
            ViewDefinition::new(
                "average song length",
                vec![Renderer::plot(
                    "average song length per month",
                    "avg_track_length_monthly",
                    SeriesOptions::minutes(),
                )],
            ),
            ViewDefinition::new(
                SAMPLE_VIEW,
                vec![Renderer::table(
                    "random sample of your streaming history",
                    SAMPLE_VIEW,
                    TableOptions::unsorted(),
                )],
            ),
        ])
    }

    /// Views offered as tabs. The sample view is only reached through its
    /// own button.
    pub fn tab_names(&self) -> impl Iterator<Item = &str> {
        self.names().filter(|name| *name != SAMPLE_VIEW)
    }
}
