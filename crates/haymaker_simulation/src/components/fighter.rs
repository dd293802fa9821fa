//! Базовые компоненты бойцов: Health, Stamina, маркеры

use bevy::prelude::*;

/// Маркер: боец под управлением игрока
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct PlayerFighter;

/// Маркер: боец под управлением AI
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct OpponentFighter;

/// Здоровье бойца
///
/// Инвариант: 0 ≤ current ≤ max
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct Health {
    pub current: u32,
    pub max: u32,
}

impl Default for Health {
    fn default() -> Self {
        Self::new(100) // Player default 100 HP
    }
}

impl Health {
    pub fn new(max: u32) -> Self {
        Self { current: max, max }
    }

    pub fn is_alive(&self) -> bool {
        self.current > 0
    }

    pub fn percent(&self) -> f32 {
        self.current as f32 / self.max as f32
    }

    pub fn take_damage(&mut self, amount: u32) {
        self.current = self.current.saturating_sub(amount);
    }

    pub fn heal(&mut self, amount: u32) {
        self.current = (self.current + amount).min(self.max);
    }

    /// Полный сброс под новый max (новый раунд / новый оппонент)
    pub fn reset(&mut self, max: u32) {
        self.max = max;
        self.current = max;
    }
}

/// Выносливость: расходуется ударами и уклонами, восстанавливается по тику
///
/// Инвариант: 0.0 ≤ current ≤ max
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct Stamina {
    pub current: f32,
    pub max: f32,
    pub regen_rate: f32, // units per second
}

impl Default for Stamina {
    fn default() -> Self {
        Self::new(100.0)
    }
}

impl Stamina {
    pub fn new(max: f32) -> Self {
        Self {
            current: max,
            max,
            // 0.8 за кадр при 60Hz в оригинальной настройке
            regen_rate: 48.0,
        }
    }

    pub fn can_afford(&self, cost: f32) -> bool {
        self.current >= cost
    }

    pub fn consume(&mut self, cost: f32) -> bool {
        if self.can_afford(cost) {
            self.current -= cost;
            true
        } else {
            false
        }
    }

    pub fn restore(&mut self, amount: f32) {
        self.current = (self.current + amount).min(self.max);
    }

    pub fn regenerate(&mut self, delta_time: f32) {
        self.current = (self.current + self.regen_rate * delta_time).min(self.max);
    }

    pub fn reset(&mut self) {
        self.current = self.max;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_damage() {
        let mut health = Health::new(200);
        assert_eq!(health.current, 200);

        health.take_damage(30);
        assert_eq!(health.current, 170);
        assert!(health.is_alive());

        health.take_damage(500); // Saturating sub
        assert_eq!(health.current, 0);
        assert!(!health.is_alive());
    }

    #[test]
    fn test_health_heal_clamped() {
        let mut health = Health::new(100);
        health.take_damage(50);
        health.heal(80);
        assert_eq!(health.current, 100);
    }

    #[test]
    fn test_health_reset_rescales_max() {
        let mut health = Health::new(200);
        health.take_damage(120);

        health.reset(240); // Difficulty-scaled rematch
        assert_eq!(health.max, 240);
        assert_eq!(health.current, 240);
    }

    #[test]
    fn test_stamina_consume() {
        let mut stamina = Stamina::new(100.0);

        assert!(stamina.consume(12.0));
        assert_eq!(stamina.current, 88.0);

        assert!(!stamina.consume(100.0)); // Недостаточно
        assert_eq!(stamina.current, 88.0); // Не изменилась
    }

    #[test]
    fn test_stamina_boundary_exact_cost() {
        let mut stamina = Stamina::new(100.0);
        stamina.current = 12.0;
        assert!(stamina.consume(12.0)); // Ровно хватает
        assert_eq!(stamina.current, 0.0);
        assert!(!stamina.consume(12.0)); // Уже нет
    }

    #[test]
    fn test_stamina_restore_and_regen_clamped() {
        let mut stamina = Stamina::new(100.0);
        stamina.consume(50.0);

        stamina.restore(10.0); // Dodge reward
        assert_eq!(stamina.current, 60.0);

        stamina.regenerate(2.0); // 2 sec × 48/sec, clamp at max
        assert_eq!(stamina.current, 100.0);
    }
}
