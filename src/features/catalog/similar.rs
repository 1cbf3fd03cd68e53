use crate::features::catalog::models::{Category, Vehicle};
use rand::seq::SliceRandom;
use rand::Rng;

/// 詳細画面に表示する類似車両の件数
pub const DEFAULT_SIMILAR_COUNT: usize = 4;

/// 類似車両を選ぶ
///
/// 同じカテゴリーの車両を元の順序で優先し、足りない分は残りの車両から
/// 重複なしでランダムに補う。対象車両自身は含めない。
/// 候補が尽きた場合は`count`件未満を返す。
///
/// # 引数
/// * `all` - 全車両
/// * `exclude_id` - 詳細表示中の車両ID
/// * `category` - 詳細表示中の車両のカテゴリー
/// * `count` - 最大件数
/// * `rng` - 補完に使う乱数生成器
pub fn pick_similar<R: Rng + ?Sized>(
    all: &[Vehicle],
    exclude_id: &str,
    category: &Category,
    count: usize,
    rng: &mut R,
) -> Vec<Vehicle> {
    let mut picked: Vec<Vehicle> = all
        .iter()
        .filter(|v| v.id != exclude_id && &v.effective_category() == category)
        .take(count)
        .cloned()
        .collect();

    if picked.len() < count {
        let mut rest: Vec<&Vehicle> = all
            .iter()
            .filter(|v| v.id != exclude_id && !picked.iter().any(|p| p.id == v.id))
            .collect();
        rest.shuffle(rng);

        let needed = count - picked.len();
        picked.extend(rest.into_iter().take(needed).cloned());
    }

    log::debug!(
        "類似車両を選択しました: exclude_id={exclude_id}, category={category}, count={}",
        picked.len()
    );

    picked
}
