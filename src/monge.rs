use std::collections::VecDeque;
use std::fmt::{self, Display};
use std::ops::Add;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Border {
    left: usize,
    right: usize,
    top: usize,
    bottom: usize,
}

/// Minimum-cost matching of every red to a blue over a bitonic Monge array.
///
/// Reds index rows (`i`), blues index columns (`j`). The feasible band is
/// stored as `diagonals_amount` counter-diagonals: diagonal `k` holds the
/// costs at `(e, k + e - 1)` for `e` in `1..=height` (all 1-indexed).
///
/// The cost matrix is assumed to satisfy the quadrangle inequality along the
/// diagonals, which holds when both sides are sorted and cost is an absolute
/// difference. This is not checked.
///
/// Reference: Aggarwal, Bar-Noy, Khuller, Kravets, Schieber, "Efficient
/// minimum cost matching using quadrangle inequality", FOCS 1992, section 4.
pub struct BitonicMongeArray<'a, R, B, C, F> {
    reds: &'a [R],
    blues: &'a [B],
    distance: F,
    diagonals: Vec<Vec<C>>,
}

impl<'a, R, B, C, F> BitonicMongeArray<'a, R, B, C, F>
where
    C: Copy + PartialOrd + Add<Output = C> + Default,
    F: Fn(&R, &B) -> C,
{
    pub fn new(reds: &'a [R], blues: &'a [B], distance: F) -> Result<Self> {
        if reds.len() > blues.len() {
            return Err(Error::InvalidArgument(format!(
                "reds ({}) cannot be longer than blues ({})",
                reds.len(),
                blues.len()
            )));
        }

        let diagonals_amount = blues.len() - reds.len() + 1;
        let diagonals = (1..=diagonals_amount)
            .map(|k| {
                (1..=reds.len())
                    .map(|e| {
                        let (i, j) = into_array_indices(k, e);
                        distance(&reds[i - 1], &blues[j - 1])
                    })
                    .collect()
            })
            .collect();

        Ok(Self {
            reds,
            blues,
            distance,
            diagonals,
        })
    }

    pub fn height(&self) -> usize {
        self.reds.len()
    }

    pub fn diagonals_amount(&self) -> usize {
        self.diagonals.len()
    }

    /// One entry per red, in order: the assigned blue and its cost.
    pub fn perfmatch(&self) -> Vec<Option<(C, &'a B)>> {
        let blues = self.blues;
        self.perfmatch_indices()
            .into_iter()
            .map(|m| m.map(|(cost, j)| (cost, &blues[j])))
            .collect()
    }

    /// Like [`perfmatch`](Self::perfmatch), with 0-based blue indices.
    pub fn perfmatch_indices(&self) -> Vec<Option<(C, usize)>> {
        let height = self.height();

        if self.diagonals_amount() == 1 {
            return (0..height).map(|e| Some((self.diagonals[0][e], e))).collect();
        }

        let mut result: Vec<Option<(C, usize)>> = vec![None; height];
        let mut borders = VecDeque::new();
        borders.push_back(Border {
            left: 1,
            right: self.diagonals_amount(),
            top: 1,
            bottom: height,
        });

        while let Some(border) = borders.pop_front() {
            if border.left == border.right {
                for x in border.top..=border.bottom {
                    self.update_result(&mut result, border.left, x);
                }
                continue;
            } else if border.top == border.bottom {
                for k in border.left..=border.right {
                    self.update_result(&mut result, k, border.top);
                }
                continue;
            } else if border.top > border.bottom {
                continue;
            }

            let center_k = (border.left + border.right) / 2;
            let separating_row = self.find_separating_row(center_k, border.top, border.bottom);

            borders.push_back(Border {
                left: border.left,
                right: center_k,
                top: border.top,
                bottom: separating_row,
            });
            if separating_row <= border.bottom {
                borders.push_back(Border {
                    left: center_k + 1,
                    right: border.right,
                    top: separating_row + 1,
                    bottom: border.bottom,
                });
            }
        }

        result
    }

    /// Every row must be covered; an uncovered row means the input broke the
    /// matcher's preconditions.
    pub fn perfmatch_complete(&self) -> Result<Vec<(C, &'a B)>> {
        self.perfmatch()
            .into_iter()
            .enumerate()
            .map(|(i, m)| m.ok_or(Error::UnmatchedRow(i)))
            .collect()
    }

    // Keeps the cheaper assignment; on a tie the later writer wins.
    fn update_result(&self, result: &mut [Option<(C, usize)>], diagonal: usize, element: usize) {
        let (i, j) = into_array_indices(diagonal, element);
        let new_cost = self.diagonals[diagonal - 1][element - 1];

        if let Some((cost, _)) = result[i - 1] {
            if cost < new_cost {
                return;
            }
        }
        result[i - 1] = Some((new_cost, j - 1));
    }

    /// Scans `top..=bottom`, moving the separating row down to `x` whenever
    /// diagonal `center_k` is strictly cheaper than `center_k + 1` over the
    /// rows since the current separator.
    fn find_separating_row(&self, center_k: usize, top: usize, bottom: usize) -> usize {
        let v = &self.diagonals[center_k - 1];
        let w = &self.diagonals[center_k];

        let mut separating = top;
        let mut v_sum = C::default();
        let mut w_sum = C::default();
        for x in top..=bottom {
            v_sum = v_sum + v[x - 1];
            w_sum = w_sum + w[x - 1];
            if v_sum < w_sum {
                separating = x;
                v_sum = v[x - 1];
                w_sum = w[x - 1];
            }
        }
        separating
    }
}

impl<'a, R, B, C, F> BitonicMongeArray<'a, R, B, C, F>
where
    R: Display,
    B: Display,
    C: Copy + PartialOrd + Add<Output = C> + Default + Display,
    F: Fn(&R, &B) -> C,
{
    /// Renders the full cost grid, bracketing each red's matched cell.
    pub fn show<W: fmt::Write>(&self, out: &mut W) -> fmt::Result {
        let matching = self.perfmatch_indices();
        let col = self
            .blues
            .iter()
            .map(|b| b.to_string().len())
            .chain(self.reds.iter().map(|r| r.to_string().len()))
            .max()
            .unwrap_or(0)
            + 2;

        write!(out, " {:col$} ", "")?;
        for blue in self.blues {
            write!(out, " {:<col$} ", blue.to_string())?;
        }
        writeln!(out)?;

        for (i, red) in self.reds.iter().enumerate() {
            write!(out, " {:<col$} ", red.to_string())?;
            for (j, blue) in self.blues.iter().enumerate() {
                let cost = (self.distance)(red, blue).to_string();
                if matches!(matching[i], Some((_, mj)) if mj == j) {
                    write!(out, "[{cost:<col$}]")?;
                } else {
                    write!(out, " {cost:<col$} ")?;
                }
            }
            writeln!(out)?;
        }
        Ok(())
    }
}

// diagonal coordinates -> 1-indexed (row, column)
fn into_array_indices(diagonal: usize, element: usize) -> (usize, usize) {
    (element, diagonal + element - 1)
}
