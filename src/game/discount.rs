//! No Claims Bonus tiers.
//!
//! Every food eaten counts as one claim-free year. The tier table maps
//! years to the discount shown to the player.

/// One row of the NCB table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NcbTier {
    /// Claim-free years needed to reach this tier
    pub years: u32,
    /// Discount in percent
    pub discount: u32,
    pub message: &'static str,
}

/// Tiers ordered by ascending `years`; the first entry must be zero years.
pub const NCB_TIERS: &[NcbTier] = &[
    NcbTier {
        years: 0,
        discount: 0,
        message: "Start building your No Claims Bonus!",
    },
    NcbTier {
        years: 1,
        discount: 30,
        message: "Great start! 1 claim-free year gives you 30% off!",
    },
    NcbTier {
        years: 2,
        discount: 40,
        message: "Excellent! 2 years claim-free = 40% discount!",
    },
    NcbTier {
        years: 3,
        discount: 50,
        message: "Fantastic! 3 years claim-free = 50% discount!",
    },
    NcbTier {
        years: 4,
        discount: 60,
        message: "Outstanding! 4 years = 60% off your premium!",
    },
    NcbTier {
        years: 5,
        discount: 65,
        message: "Amazing! 5+ years = 65% discount! You're a safe driver!",
    },
    NcbTier {
        years: 9,
        discount: 75,
        message: "Incredible! 9+ years = 75% discount! Master driver!",
    },
    NcbTier {
        years: 15,
        discount: 80,
        message: "Legendary! 15+ years = 80% discount! Insurance hero!",
    },
];

/// The highest tier whose threshold `score` has reached
pub fn discount_for(score: u32) -> &'static NcbTier {
    NCB_TIERS
        .iter()
        .rev()
        .find(|tier| score >= tier.years)
        .unwrap_or(&NCB_TIERS[0])
}

/// Headline for the game-over screen
pub fn final_score_line(score: u32) -> String {
    let plural = if score == 1 { "" } else { "s" };
    format!("You achieved {score} claim-free year{plural}!")
}

/// Closing remark for the game-over screen
pub fn final_message(score: u32) -> String {
    let tier = discount_for(score);
    let remark = if score > 0 { "Great driving!" } else { "Try again!" };
    format!(
        "That earned you a {}% discount on your insurance. {remark}",
        tier.discount
    )
}
