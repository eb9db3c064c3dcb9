//! In-memory volume effect instance

use async_trait::async_trait;
use fxc_effect::{
    EffectControl, EffectDescriptor, EffectError, Volume, VolumeCapability, VolumeTag,
    MAX_LEVEL_DB, MIN_LEVEL_DB,
};
use tokio::sync::Mutex;

#[derive(Debug)]
struct State {
    opened: bool,
    level_db: i32,
    mute: bool,
}

impl State {
    fn closed() -> Self {
        Self {
            opened: false,
            level_db: MIN_LEVEL_DB,
            mute: false,
        }
    }
}

/// Reference volume effect.
///
/// Holds one value per parameter family behind a mutex. Parameter traffic
/// is only legal between `open` and `close`; a rejected set never touches
/// the stored state.
pub struct VolumeEffect {
    descriptor: EffectDescriptor,
    state: Mutex<State>,
}

impl VolumeEffect {
    pub fn new(descriptor: EffectDescriptor) -> Self {
        Self {
            descriptor,
            state: Mutex::new(State::closed()),
        }
    }

    /// Reference descriptor fields with the given capability
    pub fn with_capability(capability: VolumeCapability) -> Self {
        Self::new(
            EffectDescriptor::new("volume", capability)
                .with_implementor("FXC Reference")
                .with_version(env!("CARGO_PKG_VERSION")),
        )
    }

    fn accepts_level(&self, level: i32) -> bool {
        level >= MIN_LEVEL_DB
            && level <= MAX_LEVEL_DB
            && level <= self.descriptor.capability.max_level_db
    }
}

#[async_trait]
impl EffectControl for VolumeEffect {
    async fn descriptor(&self) -> Result<EffectDescriptor, EffectError> {
        Ok(self.descriptor.clone())
    }

    async fn open(&self) -> Result<(), EffectError> {
        let mut state = self.state.lock().await;
        if state.opened {
            return Err(EffectError::IllegalState("instance already open".into()));
        }

        // seed family defaults at open, floor level and unmuted
        *state = State {
            opened: true,
            level_db: MIN_LEVEL_DB,
            mute: false,
        };
        tracing::debug!(name = %self.descriptor.name, "effect opened");
        Ok(())
    }

    async fn close(&self) -> Result<(), EffectError> {
        let mut state = self.state.lock().await;
        if !state.opened {
            return Err(EffectError::IllegalState("instance not open".into()));
        }

        state.opened = false;
        tracing::debug!(name = %self.descriptor.name, "effect closed");
        Ok(())
    }

    async fn set_parameter(&self, value: Volume) -> Result<(), EffectError> {
        let mut state = self.state.lock().await;
        if !state.opened {
            return Err(EffectError::IllegalState(
                "set_parameter on a closed instance".into(),
            ));
        }

        match value {
            Volume::LevelDb(level) => {
                if !self.accepts_level(level) {
                    tracing::debug!(level, "level refused");
                    return Err(EffectError::IllegalArgument(format!(
                        "level {} outside [{}, {}]",
                        level,
                        MIN_LEVEL_DB,
                        MAX_LEVEL_DB.min(self.descriptor.capability.max_level_db)
                    )));
                }
                state.level_db = level;
            }
            Volume::Mute(mute) => {
                state.mute = mute;
            }
        }

        tracing::debug!(value = %value, "parameter stored");
        Ok(())
    }

    async fn get_parameter(&self, tag: VolumeTag) -> Result<Volume, EffectError> {
        let state = self.state.lock().await;
        if !state.opened {
            return Err(EffectError::IllegalState(
                "get_parameter on a closed instance".into(),
            ));
        }

        Ok(match tag {
            VolumeTag::LevelDb => Volume::LevelDb(state.level_db),
            VolumeTag::Mute => Volume::Mute(state.mute),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_full_range() -> VolumeEffect {
        VolumeEffect::with_capability(VolumeCapability::full_range())
    }

    #[tokio::test]
    async fn set_then_get_round_trips() {
        let effect = open_full_range();
        effect.open().await.unwrap();

        effect.set_parameter(Volume::LevelDb(-100)).await.unwrap();
        assert_eq!(
            effect.get_parameter(VolumeTag::LevelDb).await.unwrap(),
            Volume::LevelDb(-100)
        );

        effect.set_parameter(Volume::Mute(true)).await.unwrap();
        assert_eq!(
            effect.get_parameter(VolumeTag::Mute).await.unwrap(),
            Volume::Mute(true)
        );
    }

    #[tokio::test]
    async fn open_seeds_defaults() {
        let effect = open_full_range();
        effect.open().await.unwrap();

        assert_eq!(
            effect.get_parameter(VolumeTag::LevelDb).await.unwrap(),
            Volume::LevelDb(MIN_LEVEL_DB)
        );
        assert_eq!(
            effect.get_parameter(VolumeTag::Mute).await.unwrap(),
            Volume::Mute(false)
        );
    }

    #[tokio::test]
    async fn out_of_band_level_is_rejected() {
        let effect = open_full_range();
        effect.open().await.unwrap();

        let err = effect
            .set_parameter(Volume::LevelDb(MAX_LEVEL_DB + 1))
            .await
            .unwrap_err();
        assert!(err.is_rejection());

        let err = effect
            .set_parameter(Volume::LevelDb(MIN_LEVEL_DB - 1))
            .await
            .unwrap_err();
        assert!(err.is_rejection());
    }

    #[tokio::test]
    async fn capability_cap_is_enforced() {
        let effect = VolumeEffect::with_capability(VolumeCapability::capped(-1200));
        effect.open().await.unwrap();

        effect.set_parameter(Volume::LevelDb(-1200)).await.unwrap();
        let err = effect
            .set_parameter(Volume::LevelDb(-1199))
            .await
            .unwrap_err();
        assert!(err.is_rejection());
    }

    #[tokio::test]
    async fn rejected_set_leaves_state_alone() {
        let effect = open_full_range();
        effect.open().await.unwrap();

        effect.set_parameter(Volume::LevelDb(-600)).await.unwrap();
        let _ = effect
            .set_parameter(Volume::LevelDb(MAX_LEVEL_DB + 1))
            .await
            .unwrap_err();

        assert_eq!(
            effect.get_parameter(VolumeTag::LevelDb).await.unwrap(),
            Volume::LevelDb(-600)
        );
    }

    #[tokio::test]
    async fn parameter_traffic_requires_open() {
        let effect = open_full_range();

        let err = effect.set_parameter(Volume::Mute(true)).await.unwrap_err();
        assert!(matches!(err, EffectError::IllegalState(_)));

        let err = effect.get_parameter(VolumeTag::Mute).await.unwrap_err();
        assert!(matches!(err, EffectError::IllegalState(_)));
    }

    #[tokio::test]
    async fn double_open_and_double_close_are_illegal() {
        let effect = open_full_range();
        effect.open().await.unwrap();
        assert!(matches!(
            effect.open().await.unwrap_err(),
            EffectError::IllegalState(_)
        ));

        effect.close().await.unwrap();
        assert!(matches!(
            effect.close().await.unwrap_err(),
            EffectError::IllegalState(_)
        ));
    }

    #[tokio::test]
    async fn reopen_resets_defaults() {
        let effect = open_full_range();
        effect.open().await.unwrap();
        effect.set_parameter(Volume::LevelDb(-42)).await.unwrap();
        effect.close().await.unwrap();

        effect.open().await.unwrap();
        assert_eq!(
            effect.get_parameter(VolumeTag::LevelDb).await.unwrap(),
            Volume::LevelDb(MIN_LEVEL_DB)
        );
    }
}
