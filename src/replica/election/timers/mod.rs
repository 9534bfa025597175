mod deadline;
mod follower_timer;
mod leader_timer;
mod time;

pub(super) use follower_timer::FollowerTimerHandle;
pub(super) use leader_timer::LeaderTimerHandle;
