use crate::random::RandomSource;

/// Replies served when the completion service is absent or failing.
pub const MOCK_REPLIES: &[&str] = &[
    "That's an interesting question! I think the answer depends on several factors, but generally speaking, it's good to consider multiple perspectives.",
    "Based on my understanding, this is a complex topic with no single correct answer. It's worth exploring different viewpoints!",
    "I'd recommend taking a step-by-step approach to solve this problem. First, break it down into smaller parts, then tackle each one systematically.",
    "That's actually quite funny when you think about it! The unexpected juxtaposition creates humor.",
    "I understand this might be challenging. Remember that persistence is key, and it's okay to ask for help when needed.",
    "Wow, that's a fascinating question! The possibilities are endless, and it's exciting to think about the implications.",
    "I'm sorry to hear that. It's natural to feel this way sometimes, and acknowledging your emotions is an important first step.",
    "That's a great observation! You've spotted something many people miss.",
    "I'm afraid I don't have enough information to provide a complete answer, but I'd be happy to help if you can share more details.",
];

pub fn pick_mock_reply(rng: &dyn RandomSource) -> &'static str {
    MOCK_REPLIES[rng.pick(MOCK_REPLIES.len()) % MOCK_REPLIES.len()]
}
