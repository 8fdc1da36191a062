// Copyright 2025 Chris Custine
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::path::PathBuf;

use walkers::sources::{Attribution, TileSource};
use walkers::{HttpOptions, HttpTiles, TileId};

pub const ATTRIBUTION_TEXT: &str = "© OpenStreetMap contributors";
pub const ATTRIBUTION_URL: &str = "https://www.openstreetmap.org/copyright";

/// Tile source for the standard OpenStreetMap raster tiles
/// Uses subdomain load balancing across a-c.tile.openstreetmap.org
pub struct OpenStreetMapSource;

impl TileSource for OpenStreetMapSource {
    fn tile_url(&self, tile_id: TileId) -> String {
        // Subdomain load balancing (a, b, c) based on tile coordinates
        let subdomain = ['a', 'b', 'c'][((tile_id.x + tile_id.y) % 3) as usize];

        format!(
            "https://{}.tile.openstreetmap.org/{}/{}/{}.png",
            subdomain, tile_id.zoom, tile_id.x, tile_id.y
        )
    }

    fn attribution(&self) -> Attribution {
        Attribution {
            text: ATTRIBUTION_TEXT,
            url: ATTRIBUTION_URL,
            logo_light: None,
            logo_dark: None,
        }
    }
}

/// On-disk tile cache location
pub fn tile_cache_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from(".cache"))
        .join("ocean-hazard-watch")
        .join("tiles")
}

/// Create the base map tile fetcher with disk caching enabled
pub fn base_map_tiles(ctx: &egui::Context) -> HttpTiles {
    let http_options = HttpOptions {
        cache: Some(tile_cache_dir()),
        ..Default::default()
    };
    HttpTiles::with_options(OpenStreetMapSource, http_options, ctx.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tile_url_balances_subdomains() {
        let source = OpenStreetMapSource;
        assert_eq!(
            source.tile_url(TileId { x: 0, y: 0, zoom: 1 }),
            "https://a.tile.openstreetmap.org/1/0/0.png"
        );
        assert_eq!(
            source.tile_url(TileId { x: 22, y: 15, zoom: 5 }),
            "https://b.tile.openstreetmap.org/5/22/15.png"
        );
    }

    #[test]
    fn test_attribution() {
        let attribution = OpenStreetMapSource.attribution();
        assert_eq!(attribution.text, ATTRIBUTION_TEXT);
        assert_eq!(attribution.url, ATTRIBUTION_URL);
    }

    #[test]
    fn test_cache_dir_is_namespaced() {
        let dir = tile_cache_dir();
        assert!(dir.ends_with("ocean-hazard-watch/tiles"));
    }
}
