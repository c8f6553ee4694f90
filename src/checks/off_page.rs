//! Off-page SEO rules
//!
//! Backlink and authority metrics come from third-party link indexes, so
//! every rule here reports `info` with its declared impact.

use super::registry::CheckRule;
use super::result::Category;
use super::support::CheckInfo;

const CATEGORY: Category = Category::OffPage;

pub(super) fn rules() -> Vec<CheckRule> {
    vec![
        CheckRule::unmeasured(
            DOMAIN_AUTHORITY,
            "Requires SEO tool integration",
            "Domain Authority comes from Moz's link index",
        ),
        CheckRule::unmeasured(
            DOMAIN_RATING,
            "Requires Ahrefs integration",
            "Domain Rating comes from Ahrefs' link index",
        ),
        CheckRule::unmeasured(
            REFERRING_DOMAINS,
            "Requires backlink analysis tool",
            "Referring domains need a backlink index",
        ),
        CheckRule::unmeasured(
            LOW_AUTHORITY_BACKLINKS,
            "Requires backlink audit",
            "Link source quality needs a backlink index",
        ),
        CheckRule::unmeasured(
            SPAM_SCORE,
            "Requires Moz or similar tool",
            "Spam score needs a backlink index",
        ),
        CheckRule::unmeasured(
            ANCHOR_DISTRIBUTION,
            "Requires backlink analysis",
            "Inbound anchor text needs a backlink index",
        ),
        CheckRule::unmeasured(
            NOFOLLOW_RATIO,
            "Requires link profile analysis",
            "Inbound link attributes need a backlink index",
        ),
        CheckRule::unmeasured(
            DIRECTORY_CITATIONS,
            "Manual verification required",
            "Directory listings live outside the site",
        ),
        CheckRule::unmeasured(
            GUEST_POSTING,
            "Strategic assessment needed",
            "Outreach activity is not visible on the site",
        ),
        CheckRule::unmeasured(
            COMPETITOR_GAP,
            "Competitive analysis required",
            "Competitor link profiles need a backlink index",
        ),
    ]
}

const DOMAIN_AUTHORITY: CheckInfo = CheckInfo {
    name: "Low Domain Authority (DA <30)",
    category: CATEGORY,
    impact: 95,
    recommended: "DA 50+",
    ranking_impact: "Authority strongly predicts how competitive the site can be",
    solution: "Earn links from relevant, authoritative sites through content and PR",
    enhancements: &["Track DA monthly against competitors"],
};

const DOMAIN_RATING: CheckInfo = CheckInfo {
    name: "Low Domain Rating (DR <30)",
    category: CATEGORY,
    impact: 92,
    recommended: "DR 40+",
    ranking_impact: "Link strength correlates with ranking potential",
    solution: "Build links from high-DR, topically related domains",
    enhancements: &[],
};

const REFERRING_DOMAINS: CheckInfo = CheckInfo {
    name: "Few referring domains",
    category: CATEGORY,
    impact: 90,
    recommended: "100+ quality referring domains",
    ranking_impact: "The number of unique linking domains is a core ranking factor",
    solution: "Create linkable assets such as studies, tools and guides",
    enhancements: &[],
};

const LOW_AUTHORITY_BACKLINKS: CheckInfo = CheckInfo {
    name: "High percentage of backlinks from low-authority domains",
    category: CATEGORY,
    impact: 80,
    recommended: "<30% from low-authority sites",
    ranking_impact: "Low-quality links pass little value and can look manipulative",
    solution: "Focus outreach on reputable sites and disavow toxic links",
    enhancements: &[],
};

const SPAM_SCORE: CheckInfo = CheckInfo {
    name: "High spam score in backlink profile",
    category: CATEGORY,
    impact: 88,
    recommended: "Spam score <5%",
    ranking_impact: "Spammy link profiles risk manual actions",
    solution: "Audit backlinks and disavow spammy domains",
    enhancements: &[],
};

const ANCHOR_DISTRIBUTION: CheckInfo = CheckInfo {
    name: "Unnatural anchor text distribution",
    category: CATEGORY,
    impact: 75,
    recommended: "Natural mix: 40% branded, 30% generic, 20% exact, 10% other",
    ranking_impact: "Over-optimized anchors are a classic spam signal",
    solution: "Favor branded and natural anchors in outreach",
    enhancements: &[],
};

const NOFOLLOW_RATIO: CheckInfo = CheckInfo {
    name: "No-follow ratio too high",
    category: CATEGORY,
    impact: 70,
    recommended: "80-90% dofollow links",
    ranking_impact: "Nofollow links pass little ranking value",
    solution: "Pursue editorial links that pass value",
    enhancements: &[],
};

const DIRECTORY_CITATIONS: CheckInfo = CheckInfo {
    name: "Missing citations from industry directories",
    category: CATEGORY,
    impact: 60,
    recommended: "Listed in top 20 industry directories",
    ranking_impact: "Citations support local and niche authority",
    solution: "Claim listings in the main directories for the industry",
    enhancements: &[],
};

const GUEST_POSTING: CheckInfo = CheckInfo {
    name: "No guest posting or outreach strategy",
    category: CATEGORY,
    impact: 72,
    recommended: "Active outreach program with 2-4 quality placements/month",
    ranking_impact: "Steady outreach keeps the link profile growing",
    solution: "Pitch relevant publications with original content",
    enhancements: &[],
};

const COMPETITOR_GAP: CheckInfo = CheckInfo {
    name: "Competitor backlink gap",
    category: CATEGORY,
    impact: 85,
    recommended: "Within 20% of top 3 competitors",
    ranking_impact: "Link gaps explain many ranking gaps",
    solution: "Target sites that link to several competitors but not to you",
    enhancements: &[],
};
