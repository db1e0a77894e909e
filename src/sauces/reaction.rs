//! Like / neutral / dislike state for one user on one sauce.
//!
//! `transition` is pure: it maps the caller's current membership and the
//! requested reaction to the new membership plus count deltas.
//! `apply_reaction` folds that result into a `Sauce`.

use serde_json::Value;
use uuid::Uuid;

use crate::error::FieldError;
use crate::sauces::repo::Sauce;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reaction {
    Like,
    Neutral,
    Dislike,
}

impl TryFrom<i64> for Reaction {
    type Error = i64;

    fn try_from(v: i64) -> Result<Self, Self::Error> {
        match v {
            1 => Ok(Reaction::Like),
            0 => Ok(Reaction::Neutral),
            -1 => Ok(Reaction::Dislike),
            other => Err(other),
        }
    }
}

/// Reads `{"like": 1 | 0 | -1}`.
pub fn parse_reaction(body: &Value) -> Result<Reaction, Vec<FieldError>> {
    let invalid = || vec![FieldError::new("like", "like must be one of 1, 0 or -1")];
    body.get("like")
        .and_then(Value::as_i64)
        .ok_or_else(invalid)
        .and_then(|v| Reaction::try_from(v).map_err(|_| invalid()))
}

/// Which set the user currently sits in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Membership {
    Liked,
    None,
    Disliked,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub membership: Membership,
    pub likes_delta: i32,
    pub dislikes_delta: i32,
}

pub fn transition(current: Membership, requested: Reaction) -> Transition {
    let target = match requested {
        Reaction::Like => Membership::Liked,
        Reaction::Neutral => Membership::None,
        Reaction::Dislike => Membership::Disliked,
    };
    let weight = |m: Membership| match m {
        Membership::Liked => (1, 0),
        Membership::None => (0, 0),
        Membership::Disliked => (0, 1),
    };
    let (from_likes, from_dislikes) = weight(current);
    let (to_likes, to_dislikes) = weight(target);
    Transition {
        membership: target,
        likes_delta: to_likes - from_likes,
        dislikes_delta: to_dislikes - from_dislikes,
    }
}

pub fn membership_of(sauce: &Sauce, user_id: Uuid) -> Membership {
    if sauce.users_liked.contains(&user_id) {
        Membership::Liked
    } else if sauce.users_disliked.contains(&user_id) {
        Membership::Disliked
    } else {
        Membership::None
    }
}

/// Applies `requested` for `user_id`, updating both sets and both counts.
pub fn apply_reaction(sauce: &mut Sauce, user_id: Uuid, requested: Reaction) -> Transition {
    let t = transition(membership_of(sauce, user_id), requested);

    sauce.users_liked.retain(|id| *id != user_id);
    sauce.users_disliked.retain(|id| *id != user_id);
    match t.membership {
        Membership::Liked => sauce.users_liked.push(user_id),
        Membership::Disliked => sauce.users_disliked.push(user_id),
        Membership::None => {}
    }

    sauce.likes = (sauce.likes + t.likes_delta).max(0);
    sauce.dislikes = (sauce.dislikes + t.dislikes_delta).max(0);
    t
}
