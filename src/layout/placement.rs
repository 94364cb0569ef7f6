//! Grid placement. Participants are grouped into tiles keyed by
//! (compartment, role), tiles are dealt onto a sparse grid whose row bands
//! run catalysts / reaction / regulators top to bottom and whose column
//! bands run inputs / reaction strip / outputs left to right. The grid is
//! then compacted, rows and columns are sized, and every tile is centered
//! on its cell.

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::config::LayoutConfig;
use crate::layout::geometry::{Bounds, Position};
use crate::layout::grid::Grid;
use crate::layout::index::LayoutIndex;
use crate::layout::transform::{
    center_glyph, entity_bounds, move_glyph, reaction_bounds, set_entity_size, set_reaction_size,
};
use crate::model::{CompartmentId, ContainedGlyph, EntityId, EntityRole, Layout};
use crate::text_metrics::FontMetrics;

/// Which band a tile belongs to. Inputs and outputs stack their glyphs
/// vertically, catalysts and regulators line them up horizontally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum TileRole {
    Input,
    Output,
    Catalyst,
    Regulator,
    Reaction,
}

impl TileRole {
    fn is_vertical(self) -> bool {
        matches!(self, TileRole::Input | TileRole::Output)
    }

    fn is_horizontal(self) -> bool {
        matches!(self, TileRole::Catalyst | TileRole::Regulator)
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Tile {
    pub glyphs: Vec<ContainedGlyph>,
    pub bounds: Position,
    pub role: TileRole,
    pub compartment: CompartmentId,
}

pub(crate) fn layout_participants(
    layout: &mut Layout,
    index: &LayoutIndex,
    metrics: &dyn FontMetrics,
    config: &LayoutConfig,
) {
    for entity in &mut layout.entities {
        set_entity_size(entity, metrics, config);
    }
    set_reaction_size(&mut layout.reaction, config);

    let (mut tiles, mut grid) = build_board(layout, index, config);
    drop_empty_lines(&mut grid);

    let owners = ownership_map(layout, &grid, &tiles);
    if let Some(reaction_cell) = find_reaction(&grid, &tiles) {
        compact_inputs(layout, &mut grid, &tiles, &owners, reaction_cell);
        compact_outputs(layout, &mut grid, &tiles, &owners, reaction_cell);
        compact_horizontals(layout, &mut grid, &tiles, &owners, reaction_cell);
    }
    enforce_diagonal(&mut grid, &tiles);

    let (mut widths, mut heights) = line_sizes(&grid, &tiles);
    expand_compartment(
        layout,
        layout.root,
        &grid,
        &tiles,
        &mut widths,
        &mut heights,
        metrics,
        config,
    );

    place_tiles(layout, &grid, &mut tiles, &widths, &heights);
    compact_regulator_strips(layout, &grid, &tiles, &widths, config);
}

/// Builds every (compartment, role) tile, arranges glyphs inside each one,
/// and deals the tiles onto the grid band by band.
fn build_board(
    layout: &mut Layout,
    index: &LayoutIndex,
    config: &LayoutConfig,
) -> (Vec<Tile>, Grid<usize>) {
    let vertical_order = vertically_ordered_compartments(layout);
    let horizontal_order = horizontally_ordered_compartments(layout);

    let mut tiles: Vec<Tile> = Vec::new();
    let mut rows: Vec<usize> = Vec::new();
    let mut by_key: HashMap<(CompartmentId, TileRole), usize> = HashMap::new();

    let push = |tiles: &mut Vec<Tile>,
                    rows: &mut Vec<usize>,
                    by_key: &mut HashMap<(CompartmentId, TileRole), usize>,
                    tile: Tile,
                    row: usize| {
        by_key.insert((tile.compartment, tile.role), tiles.len());
        tiles.push(tile);
        rows.push(row);
    };

    let mut row = 0;
    for &comp in &vertical_order {
        let catalysts = members_of(layout, &index.catalysts, comp);
        if !catalysts.is_empty() {
            let tile = arrange_horizontal(layout, &catalysts, TileRole::Catalyst, comp, config);
            push(&mut tiles, &mut rows, &mut by_key, tile, row);
            row += 1;
        }
    }
    for &comp in &vertical_order {
        let mut any = false;
        let inputs = members_of(layout, &index.inputs, comp);
        if !inputs.is_empty() {
            let tile = arrange_vertical(layout, &inputs, TileRole::Input, comp, config);
            push(&mut tiles, &mut rows, &mut by_key, tile, row);
            any = true;
        }
        let outputs = members_of(layout, &index.outputs, comp);
        if !outputs.is_empty() {
            let tile = arrange_vertical(layout, &outputs, TileRole::Output, comp, config);
            push(&mut tiles, &mut rows, &mut by_key, tile, row);
            any = true;
        }
        if layout.reaction.compartment == comp {
            let bounds = reaction_bounds(&layout.reaction)
                .padded_by(config.reaction_min_h_distance, config.reaction_min_v_distance);
            let tile = Tile {
                glyphs: vec![ContainedGlyph::Reaction],
                bounds,
                role: TileRole::Reaction,
                compartment: comp,
            };
            push(&mut tiles, &mut rows, &mut by_key, tile, row);
            any = true;
        }
        if any {
            row += 1;
        }
    }
    for &comp in vertical_order.iter().rev() {
        let regulators = members_of(layout, &index.regulators, comp);
        if !regulators.is_empty() {
            let tile = arrange_horizontal(layout, &regulators, TileRole::Regulator, comp, config);
            push(&mut tiles, &mut rows, &mut by_key, tile, row);
            row += 1;
        }
    }

    let mut cols: Vec<usize> = vec![0; tiles.len()];
    let mut col = 0;
    for &comp in &horizontal_order {
        if let Some(&tile) = by_key.get(&(comp, TileRole::Input)) {
            cols[tile] = col;
            col += 1;
        }
    }
    for &comp in &horizontal_order {
        let mut any = false;
        for role in [TileRole::Catalyst, TileRole::Reaction, TileRole::Regulator] {
            if let Some(&tile) = by_key.get(&(comp, role)) {
                cols[tile] = col;
                any = true;
            }
        }
        if any {
            col += 1;
        }
    }
    for &comp in horizontal_order.iter().rev() {
        if let Some(&tile) = by_key.get(&(comp, TileRole::Output)) {
            cols[tile] = col;
            col += 1;
        }
    }

    let mut grid: Grid<usize> = Grid::new(row, col.max(1));
    for (tile, (&r, &c)) in rows.iter().zip(cols.iter()).enumerate() {
        grid.set(r, c, tile);
    }
    (tiles, grid)
}

fn members_of(layout: &Layout, entities: &[EntityId], compartment: CompartmentId) -> Vec<EntityId> {
    entities
        .iter()
        .copied()
        .filter(|&id| layout.entities[id].compartment == compartment)
        .collect()
}

/// Compartments ordered for the row bands: catalyst-bearing compartments
/// first, regulator-bearing ones last, outer compartments before inner.
fn vertically_ordered_compartments(layout: &Layout) -> Vec<CompartmentId> {
    let mut ids: Vec<CompartmentId> = (0..layout.compartments.len()).collect();
    ids.sort_by(|&a, &b| {
        true_first(
            layout.compartment_has_role(a, EntityRole::Catalyst),
            layout.compartment_has_role(b, EntityRole::Catalyst),
        )
        .then_with(|| {
            false_first(
                layout.compartment_has_role(a, EntityRole::NegativeRegulator),
                layout.compartment_has_role(b, EntityRole::NegativeRegulator),
            )
        })
        .then_with(|| {
            false_first(
                layout.compartment_has_role(a, EntityRole::PositiveRegulator),
                layout.compartment_has_role(b, EntityRole::PositiveRegulator),
            )
        })
        .then_with(|| outer_first(layout, a, b))
    });
    ids
}

/// Compartments ordered for the column bands: input-bearing compartments
/// first, output-bearing ones last, outer compartments before inner.
fn horizontally_ordered_compartments(layout: &Layout) -> Vec<CompartmentId> {
    let mut ids: Vec<CompartmentId> = (0..layout.compartments.len()).collect();
    ids.sort_by(|&a, &b| {
        true_first(
            layout.compartment_has_role(a, EntityRole::Input),
            layout.compartment_has_role(b, EntityRole::Input),
        )
        .then_with(|| {
            false_first(
                layout.compartment_has_role(a, EntityRole::Output),
                layout.compartment_has_role(b, EntityRole::Output),
            )
        })
        .then_with(|| outer_first(layout, a, b))
    });
    ids
}

fn true_first(a: bool, b: bool) -> Ordering {
    b.cmp(&a)
}

fn false_first(a: bool, b: bool) -> Ordering {
    a.cmp(&b)
}

fn outer_first(layout: &Layout, a: CompartmentId, b: CompartmentId) -> Ordering {
    if layout.is_ancestor(a, b) {
        Ordering::Less
    } else if layout.is_ancestor(b, a) {
        Ordering::Greater
    } else {
        Ordering::Equal
    }
}

/// One glyph per column; the tile is padded so the surrounding compartment
/// has room to draw.
fn arrange_horizontal(
    layout: &mut Layout,
    entities: &[EntityId],
    role: TileRole,
    compartment: CompartmentId,
    config: &LayoutConfig,
) -> Tile {
    let height = entities
        .iter()
        .map(|&id| entity_bounds(&layout.entities[id]).height)
        .fold(config.min_glyph_height, f64::max);
    let y = 0.5 * (height + config.vertical_padding);
    let mut x = 0.0;
    let mut glyphs = Vec::with_capacity(entities.len());
    for &id in entities {
        let width = entity_bounds(&layout.entities[id]).width;
        center_glyph(
            layout,
            ContainedGlyph::Entity(id),
            x + 0.5 * (config.horizontal_padding + width),
            y,
        );
        x += config.horizontal_padding + width;
        glyphs.push(ContainedGlyph::Entity(id));
    }
    Tile {
        glyphs,
        bounds: Position::new(0.0, 0.0, x, height + config.vertical_padding)
            .padded(config.compartment_padding),
        role,
        compartment,
    }
}

/// One glyph per row, switching to the staggered two-column arrangement
/// when the tile overflows.
fn arrange_vertical(
    layout: &mut Layout,
    entities: &[EntityId],
    role: TileRole,
    compartment: CompartmentId,
    config: &LayoutConfig,
) -> Tile {
    if entities.len() > config.two_column_threshold {
        return arrange_two_columns(layout, entities, role, compartment, config);
    }
    let width = entities
        .iter()
        .map(|&id| entity_bounds(&layout.entities[id]).width)
        .fold(config.min_glyph_width, f64::max);
    let x = 0.5 * (width + config.horizontal_padding);
    let mut y = 0.0;
    let mut glyphs = Vec::with_capacity(entities.len());
    for &id in entities {
        let height = entity_bounds(&layout.entities[id]).height;
        center_glyph(
            layout,
            ContainedGlyph::Entity(id),
            x,
            y + 0.5 * (config.vertical_padding + height),
        );
        y += config.vertical_padding + height;
        glyphs.push(ContainedGlyph::Entity(id));
    }
    Tile {
        glyphs,
        bounds: Position::new(0.0, 0.0, width + config.horizontal_padding, y)
            .padded(config.compartment_padding),
        role,
        compartment,
    }
}

fn arrange_two_columns(
    layout: &mut Layout,
    entities: &[EntityId],
    role: TileRole,
    compartment: CompartmentId,
    config: &LayoutConfig,
) -> Tile {
    let mut widths = [0.0f64; 2];
    for (i, &id) in entities.iter().enumerate() {
        let width = entity_bounds(&layout.entities[id]).width;
        widths[i % 2] = widths[i % 2].max(width);
    }
    let xs = [
        0.5 * widths[0],
        widths[0] + 0.5 * widths[1] + config.column_padding,
    ];
    let height = entities
        .iter()
        .map(|&id| entity_bounds(&layout.entities[id]).height)
        .fold(config.min_glyph_height, f64::max);
    let step = 0.5 * (height + config.vertical_padding);
    let mut limits = Bounds::default();
    let mut y = 0.0;
    let mut glyphs = Vec::with_capacity(entities.len());
    for (i, &id) in entities.iter().enumerate() {
        y += step;
        center_glyph(layout, ContainedGlyph::Entity(id), xs[i % 2], y);
        limits.add(entity_bounds(&layout.entities[id]));
        glyphs.push(ContainedGlyph::Entity(id));
    }
    Tile {
        glyphs,
        bounds: limits.get().unwrap_or_default(),
        role,
        compartment,
    }
}

fn drop_empty_lines(grid: &mut Grid<usize>) {
    let mut row = grid.rows();
    while row > 0 {
        row -= 1;
        if grid.row_is_empty(row) {
            grid.remove_row(row);
        }
    }
    let mut col = grid.columns();
    while col > 0 {
        col -= 1;
        if grid.column_is_empty(col) {
            grid.remove_column(col);
        }
    }
}

fn find_reaction(grid: &Grid<usize>, tiles: &[Tile]) -> Option<(usize, usize)> {
    grid.occupied()
        .find(|&(_, _, &tile)| tiles[tile].role == TileRole::Reaction)
        .map(|(r, c, _)| (r, c))
}

/// Cell ownership: which compartment may claim each cell. Children claim
/// their spans before their parents, so the innermost compartment wins.
fn ownership_map(
    layout: &Layout,
    grid: &Grid<usize>,
    tiles: &[Tile],
) -> Vec<Vec<Option<CompartmentId>>> {
    let mut owners = vec![vec![None; grid.columns()]; grid.rows()];
    claim_cells(layout, layout.root, grid, tiles, &mut owners);
    owners
}

fn claim_cells(
    layout: &Layout,
    compartment: CompartmentId,
    grid: &Grid<usize>,
    tiles: &[Tile],
    owners: &mut Vec<Vec<Option<CompartmentId>>>,
) {
    for &child in &layout.compartments[compartment].children {
        claim_cells(layout, child, grid, tiles, owners);
    }
    if let Some((min_row, max_row, min_col, max_col)) = span_of(layout, compartment, grid, tiles) {
        for row in owners.iter_mut().take(max_row + 1).skip(min_row) {
            for cell in row.iter_mut().take(max_col + 1).skip(min_col) {
                if cell.is_none() {
                    *cell = Some(compartment);
                }
            }
        }
    }
}

/// Grid span of the tiles belonging to `compartment` or any descendant.
fn span_of(
    layout: &Layout,
    compartment: CompartmentId,
    grid: &Grid<usize>,
    tiles: &[Tile],
) -> Option<(usize, usize, usize, usize)> {
    let mut span: Option<(usize, usize, usize, usize)> = None;
    for (row, col, &tile) in grid.occupied() {
        let owner = tiles[tile].compartment;
        if owner == compartment || layout.is_ancestor(compartment, owner) {
            span = Some(match span {
                None => (row, row, col, col),
                Some((min_r, max_r, min_c, max_c)) => (
                    min_r.min(row),
                    max_r.max(row),
                    min_c.min(col),
                    max_c.max(col),
                ),
            });
        }
    }
    span
}

fn owner_allows(
    layout: &Layout,
    owners: &[Vec<Option<CompartmentId>>],
    row: usize,
    col: usize,
    compartment: CompartmentId,
) -> bool {
    match owners[row][col] {
        Some(owner) => owner == compartment || layout.is_ancestor(compartment, owner),
        None => false,
    }
}

/// Slides input tiles toward the reaction column when a closer column on
/// the same row is free and owned by the same compartment (or one of its
/// descendants). Tiles with a catalyst among their glyphs stay put so the
/// hook segment keeps its clearance.
fn compact_inputs(
    layout: &Layout,
    grid: &mut Grid<usize>,
    tiles: &[Tile],
    owners: &[Vec<Option<CompartmentId>>],
    reaction: (usize, usize),
) {
    let (_, reaction_col) = reaction;
    if reaction_col < 1 {
        return;
    }
    for row in 0..grid.rows() {
        for col in 0..reaction_col.saturating_sub(1) {
            let Some(&tile) = grid.get(row, col) else {
                continue;
            };
            if tiles[tile].role != TileRole::Input {
                continue;
            }
            if tile_contains_role(layout, &tiles[tile], EntityRole::Catalyst) {
                continue;
            }
            let compartment = tiles[tile].compartment;
            for target in (col + 1..reaction_col).rev() {
                if grid.get(row, target).is_none()
                    && owner_allows(layout, owners, row, target, compartment)
                {
                    if let Some(moved) = grid.take(row, col) {
                        grid.set(row, target, moved);
                    }
                    break;
                }
            }
            // only one input tile expected per row
            break;
        }
    }
}

fn compact_outputs(
    layout: &Layout,
    grid: &mut Grid<usize>,
    tiles: &[Tile],
    owners: &[Vec<Option<CompartmentId>>],
    reaction: (usize, usize),
) {
    let (_, reaction_col) = reaction;
    for row in 0..grid.rows() {
        for col in ((reaction_col + 2)..grid.columns()).rev() {
            let Some(&tile) = grid.get(row, col) else {
                continue;
            };
            if tiles[tile].role != TileRole::Output {
                continue;
            }
            let compartment = tiles[tile].compartment;
            for target in reaction_col + 1..col {
                if grid.get(row, target).is_none()
                    && owner_allows(layout, owners, row, target, compartment)
                {
                    if let Some(moved) = grid.take(row, col) {
                        grid.set(row, target, moved);
                    }
                    break;
                }
            }
            break;
        }
    }
}

/// Moves catalyst and regulator strips into the reaction column when the
/// target cell is free and the vertical path to the reaction row is not
/// busy.
fn compact_horizontals(
    layout: &Layout,
    grid: &mut Grid<usize>,
    tiles: &[Tile],
    owners: &[Vec<Option<CompartmentId>>],
    reaction: (usize, usize),
) {
    let (reaction_row, reaction_col) = reaction;
    for row in 0..grid.rows() {
        if row == reaction_row {
            continue;
        }
        for col in 0..grid.columns() {
            if col == reaction_col {
                continue;
            }
            let Some(&tile) = grid.get(row, col) else {
                continue;
            };
            if !tiles[tile].role.is_horizontal() {
                continue;
            }
            if grid.get(row, reaction_col).is_some() {
                continue;
            }
            if !owner_allows(layout, owners, row, reaction_col, tiles[tile].compartment) {
                continue;
            }
            if path_is_busy(grid, row, reaction_row, reaction_col) {
                continue;
            }
            if let Some(moved) = grid.take(row, col) {
                grid.set(row, reaction_col, moved);
            }
        }
    }
}

/// True when any cell strictly between the two rows is occupied in the
/// given column.
fn path_is_busy(grid: &Grid<usize>, row: usize, reaction_row: usize, column: usize) -> bool {
    let (lo, hi) = if row < reaction_row {
        (row, reaction_row)
    } else {
        (reaction_row, row)
    };
    (lo + 1..hi).any(|r| grid.get(r, column).is_some())
}

fn tile_contains_role(layout: &Layout, tile: &Tile, role: EntityRole) -> bool {
    tile.glyphs.iter().any(|glyph| match glyph {
        ContainedGlyph::Entity(id) => layout.entities[*id].has_role(role),
        ContainedGlyph::Reaction => false,
    })
}

/// No row may host both a vertical and a horizontal tile: the horizontal
/// one gets its own row, above the reaction in the upper half and below it
/// in the lower half.
fn enforce_diagonal(grid: &mut Grid<usize>, tiles: &[Tile]) {
    loop {
        let Some((reaction_row, _)) = find_reaction(grid, tiles) else {
            return;
        };
        let mixed = (0..grid.rows()).find(|&row| {
            let mut vertical = false;
            let mut horizontal = false;
            for col in 0..grid.columns() {
                if let Some(&tile) = grid.get(row, col) {
                    vertical |= tiles[tile].role.is_vertical();
                    horizontal |= tiles[tile].role.is_horizontal();
                }
            }
            vertical && horizontal
        });
        let Some(row) = mixed else {
            return;
        };
        let (from, to) = if row <= reaction_row {
            grid.insert_row(row);
            (row + 1, row)
        } else {
            grid.insert_row(row + 1);
            (row, row + 1)
        };
        for col in 0..grid.columns() {
            let is_horizontal = grid
                .get(from, col)
                .is_some_and(|&tile| tiles[tile].role.is_horizontal());
            if is_horizontal && let Some(moved) = grid.take(from, col) {
                grid.set(to, col, moved);
            }
        }
    }
}

fn line_sizes(grid: &Grid<usize>, tiles: &[Tile]) -> (Vec<f64>, Vec<f64>) {
    let mut widths: Vec<f64> = vec![0.0; grid.columns()];
    let mut heights: Vec<f64> = vec![0.0; grid.rows()];
    for (row, col, &tile) in grid.occupied() {
        widths[col] = widths[col].max(tiles[tile].bounds.width);
        heights[row] = heights[row].max(tiles[tile].bounds.height);
    }
    (widths, heights)
}

/// Post-order pass widening rows and columns so every compartment can draw
/// its border and its name.
#[allow(clippy::too_many_arguments)]
fn expand_compartment(
    layout: &Layout,
    compartment: CompartmentId,
    grid: &Grid<usize>,
    tiles: &[Tile],
    widths: &mut [f64],
    heights: &mut [f64],
    metrics: &dyn FontMetrics,
    config: &LayoutConfig,
) {
    for &child in &layout.compartments[compartment].children {
        expand_compartment(layout, child, grid, tiles, widths, heights, metrics, config);
    }
    let Some((min_row, max_row, min_col, max_col)) = span_of(layout, compartment, grid, tiles)
    else {
        return;
    };
    let spanned: f64 = widths[min_col..=max_col].iter().sum();
    let min_width = 2.0 * config.compartment_padding
        + metrics.text_width(&layout.compartments[compartment].name);
    if spanned < min_width && spanned > 0.0 {
        let factor = min_width / spanned;
        for width in widths.iter_mut().take(max_col + 1).skip(min_col) {
            *width *= factor;
        }
    } else {
        widths[min_col] += config.compartment_padding;
        widths[max_col] += config.compartment_padding;
    }
    heights[min_row] += config.compartment_padding;
    heights[max_row] += config.compartment_padding;
    if compartment_hooks_over_top(layout, compartment) {
        heights[min_row] += config.catalyst_hook_clearance;
    }
}

/// True when the compartment directly contains an entity that is both an
/// input and a catalyst; its connector hooks over the top of the diagram.
fn compartment_hooks_over_top(layout: &Layout, compartment: CompartmentId) -> bool {
    layout.compartments[compartment]
        .contained
        .iter()
        .any(|glyph| match glyph {
            ContainedGlyph::Entity(id) => {
                let entity = &layout.entities[*id];
                entity.has_role(EntityRole::Input) && entity.has_role(EntityRole::Catalyst)
            }
            ContainedGlyph::Reaction => false,
        })
}

/// Centers every tile on its cell. Cell centers are running sums of half
/// widths and half heights.
fn place_tiles(
    layout: &mut Layout,
    grid: &Grid<usize>,
    tiles: &mut [Tile],
    widths: &[f64],
    heights: &[f64],
) {
    let centers_x = running_centers(widths);
    let centers_y = running_centers(heights);
    let cells: Vec<(usize, usize, usize)> =
        grid.occupied().map(|(r, c, &tile)| (r, c, tile)).collect();
    for (row, col, tile) in cells {
        let bounds = tiles[tile].bounds;
        let dx = centers_x[col] - bounds.center_x();
        let dy = centers_y[row] - bounds.center_y();
        for &glyph in &tiles[tile].glyphs {
            move_glyph(layout, glyph, dx, dy);
        }
        tiles[tile].bounds.translate(dx, dy);
    }
}

fn running_centers(sizes: &[f64]) -> Vec<f64> {
    let mut centers = Vec::with_capacity(sizes.len());
    let mut offset = 0.0;
    for &size in sizes {
        centers.push(offset + 0.5 * size);
        offset += size;
    }
    centers
}

/// Slides the glyphs of every regulator strip toward the reaction
/// center-x, keeping the configured gap between neighbours and staying
/// inside the columns the strip's compartment spans.
fn compact_regulator_strips(
    layout: &mut Layout,
    grid: &Grid<usize>,
    tiles: &[Tile],
    widths: &[f64],
    config: &LayoutConfig,
) {
    let edges = column_edges(widths);
    let reaction_cx = layout.reaction.position.center_x();
    let strips: Vec<usize> = grid
        .occupied()
        .filter(|&(_, _, &tile)| tiles[tile].role == TileRole::Regulator)
        .map(|(_, _, &tile)| tile)
        .collect();
    for tile in strips {
        let Some((_, _, min_col, max_col)) = span_of(layout, tiles[tile].compartment, grid, tiles)
        else {
            continue;
        };
        let strip_min_x = edges[min_col];
        let strip_max_x = edges[max_col + 1];

        let mut entities: Vec<EntityId> = tiles[tile]
            .glyphs
            .iter()
            .filter_map(|glyph| match glyph {
                ContainedGlyph::Entity(id) => Some(*id),
                ContainedGlyph::Reaction => None,
            })
            .collect();
        entities.sort_by(|&a, &b| {
            entity_bounds(&layout.entities[a])
                .center_x()
                .total_cmp(&entity_bounds(&layout.entities[b]).center_x())
        });

        let split = entities
            .iter()
            .position(|&id| entity_bounds(&layout.entities[id]).center_x() > reaction_cx)
            .unwrap_or(entities.len());
        let (left, right) = entities.split_at(split);

        // Glyphs may already straddle the center line, so each side's
        // sliding limit starts at whatever the other side occupies.
        let right_min_x = right
            .iter()
            .map(|&id| entity_bounds(&layout.entities[id]).x)
            .fold(f64::MAX, f64::min);
        let mut limit = reaction_cx.min(right_min_x);
        let mut left_reach = f64::MIN;
        for &id in left.iter().rev() {
            let bounds = entity_bounds(&layout.entities[id]);
            let half = 0.5 * bounds.width;
            let target = (limit - half).min(strip_max_x - half);
            let center = if target > bounds.center_x() {
                move_glyph(layout, ContainedGlyph::Entity(id), target - bounds.center_x(), 0.0);
                target
            } else {
                bounds.center_x()
            };
            left_reach = left_reach.max(center + half);
            limit = center - half - config.regulator_gap;
        }
        let mut limit = reaction_cx.max(left_reach);
        for &id in right {
            let bounds = entity_bounds(&layout.entities[id]);
            let half = 0.5 * bounds.width;
            let target = (limit + half).max(strip_min_x + half);
            let center = if target < bounds.center_x() {
                move_glyph(layout, ContainedGlyph::Entity(id), target - bounds.center_x(), 0.0);
                target
            } else {
                bounds.center_x()
            };
            limit = center + half + config.regulator_gap;
        }
    }
}

fn column_edges(widths: &[f64]) -> Vec<f64> {
    let mut edges = Vec::with_capacity(widths.len() + 1);
    let mut offset = 0.0;
    edges.push(0.0);
    for &width in widths {
        offset += width;
        edges.push(offset);
    }
    edges
}
