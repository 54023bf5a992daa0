/// Starter `.entry-rewrite.toml` written by `entry-rewrite --init`.
pub fn generate_init_template() -> String {
	r##"# entry-rewrite configuration
#
# Files named .entry-rewrite.toml are read from the current directory up to
# the filesystem root, then from ~/.entry-rewrite.toml. Settings from files
# closer to the current directory win.

# Stop looking in parent directories (the home config is still read).
root = true

# Prefix for embedded YouTube players.
# youtube-embed-url-override = "https://www.youtube-nocookie.com/embed/"

# Invidious instance used by add_youtube_video_using_invidious_player.
# invidious-instance = "yewtu.be"

# Per-feed rules. The first feed whose url_pattern matches the entry URL wins.
# Without rewrite_rules, the built-in rules for the entry's site apply.
[[feeds]]
url_pattern = "^https://news\\.ycombinator\\.com/"
rewrite_rules = "add_hn_links_using_opener"
# url_rewrite_rules = 'rewrite("^https://news\.ycombinator\.com/item\?id=(.+)"|"https://hn.algolia.com/api/v1/items/$1")'

# [[feeds]]
# url_pattern = "example\\.org"
# rewrite_rules = 'add_dynamic_image,remove(".ads, .newsletter")'
"##
	.to_string()
}
