use crate::feed::Feed;
use crate::listing::FeedCatalog;
use std::collections::HashMap;

/// Feeds sharing a category key, in catalog order.
///
/// Derived on every read and borrowed from the catalog, so it can never
/// drift from the catalog it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingGroup<'a> {
    pub name: &'a str,
    pub feeds: Vec<&'a Feed>,
}

/// Group the catalog's current feeds for display.
pub fn feed_groups(catalog: &FeedCatalog) -> Vec<ListingGroup<'_>> {
    group_feeds(catalog.current_feeds())
}

/// Partition feeds by [`Feed::group_key`].
///
/// Groups appear in the order their key is first seen; feeds keep their
/// relative order inside a group. A feed without a key becomes its own
/// group named after the feed, and never absorbs other feeds.
pub fn group_feeds(feeds: &[Feed]) -> Vec<ListingGroup<'_>> {
    let mut groups: Vec<ListingGroup<'_>> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for feed in feeds {
        match feed.group_key() {
            Some(key) => {
                let slot = *index.entry(key).or_insert_with(|| {
                    groups.push(ListingGroup {
                        name: key,
                        feeds: Vec::new(),
                    });
                    groups.len() - 1
                });
                groups[slot].feeds.push(feed);
            }
            None => {
                tracing::debug!(feed = %feed.name, "Feed has no category key, listing on its own");
                groups.push(ListingGroup {
                    name: &feed.name,
                    feeds: vec![feed],
                });
            }
        }
    }

    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn names<'a>(group: &ListingGroup<'a>) -> Vec<&'a str> {
        group.feeds.iter().map(|f| f.name.as_str()).collect()
    }

    #[test]
    fn test_empty_input_yields_no_groups() {
        assert!(group_feeds(&[]).is_empty());
    }

    #[test]
    fn test_crypto_forex_scenario() {
        let feeds = vec![
            Feed::new("ETH/USD", "Crypto"),
            Feed::new("BTC/USD", "Crypto"),
            Feed::new("EUR/USD", "Forex"),
        ];

        let groups = group_feeds(&feeds);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].name, "Crypto");
        assert_eq!(names(&groups[0]), vec!["ETH/USD", "BTC/USD"]);
        assert_eq!(groups[1].name, "Forex");
        assert_eq!(names(&groups[1]), vec!["EUR/USD"]);
    }

    #[test]
    fn test_interleaved_keys_keep_first_seen_order() {
        let feeds = vec![
            Feed::new("a", "ETH"),
            Feed::new("b", "USD"),
            Feed::new("c", "ETH"),
            Feed::new("d", "USD"),
            Feed::new("e", "BTC"),
        ];

        let groups = group_feeds(&feeds);
        let order: Vec<_> = groups.iter().map(|g| g.name).collect();
        assert_eq!(order, vec!["ETH", "USD", "BTC"]);
        assert_eq!(names(&groups[0]), vec!["a", "c"]);
        assert_eq!(names(&groups[1]), vec!["b", "d"]);
        assert_eq!(names(&groups[2]), vec!["e"]);
    }

    #[test]
    fn test_single_member_group() {
        let feeds = vec![Feed::new("XAU / USD", "Commodities")];
        let groups = group_feeds(&feeds);
        assert_eq!(groups.len(), 1);
        assert_eq!(names(&groups[0]), vec!["XAU / USD"]);
    }

    #[test]
    fn test_missing_key_gets_own_group() {
        let mut orphan_a = Feed::new("Mystery A", "");
        orphan_a.category = None;
        let mut orphan_b = Feed::new("Mystery B", "");
        orphan_b.category = None;
        let feeds = vec![
            Feed::new("ETH / USD", "USD"),
            orphan_a,
            Feed::new("BTC / USD", "USD"),
            orphan_b,
        ];

        let groups = group_feeds(&feeds);
        let order: Vec<_> = groups.iter().map(|g| g.name).collect();
        assert_eq!(order, vec!["USD", "Mystery A", "Mystery B"]);
        assert_eq!(names(&groups[0]), vec!["ETH / USD", "BTC / USD"]);
        assert_eq!(names(&groups[1]), vec!["Mystery A"]);
    }

    #[test]
    fn test_orphan_named_like_category_stays_separate() {
        let mut orphan = Feed::new("USD", "");
        orphan.category = None;
        let feeds = vec![Feed::new("ETH / USD", "USD"), orphan];

        let groups = group_feeds(&feeds);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].feeds.len(), 1);
        assert_eq!(groups[1].feeds.len(), 1);
    }

    #[test]
    fn test_pair_quote_used_when_category_missing() {
        let mut link_eth = Feed::new("LINK / ETH", "");
        link_eth.category = None;
        link_eth.pair = vec!["LINK".into(), "ETH".into()];
        let feeds = vec![Feed::new("BAT / ETH", "ETH"), link_eth];

        let groups = group_feeds(&feeds);
        assert_eq!(groups.len(), 1);
        assert_eq!(names(&groups[0]), vec!["BAT / ETH", "LINK / ETH"]);
    }

    #[test]
    fn test_grouping_is_repeatable() {
        let feeds = vec![
            Feed::new("ETH/USD", "Crypto"),
            Feed::new("EUR/USD", "Forex"),
            Feed::new("BTC/USD", "Crypto"),
        ];
        assert_eq!(group_feeds(&feeds), group_feeds(&feeds));
    }

    #[test]
    fn test_feed_groups_reads_catalog() {
        let catalog = FeedCatalog::new();
        assert!(feed_groups(&catalog).is_empty());
    }
}
